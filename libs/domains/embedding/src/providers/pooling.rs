//! Sentence head applied on top of the transformer output.
//!
//! A sentence-transformers export ships its post-processing as modules next to
//! the weights: `1_Pooling/config.json` names the pooling mode and
//! `modules.json` lists a `Normalize` layer when vectors are unit length.
//! When those files are absent the head falls back to what the model family
//! is known to use.

use ndarray::{ArrayView2, ArrayView3, Axis};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{EmbeddingError, EmbeddingResult};

pub const POOLING_CONFIG_FILE: &str = "1_Pooling/config.json";
pub const MODULES_FILE: &str = "modules.json";

/// How token vectors collapse into one sentence vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pooling {
    /// First token (`[CLS]`)
    Cls,
    /// Attention-masked mean over tokens
    Mean,
}

impl FromStr for Pooling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cls" => Ok(Self::Cls),
            "mean" => Ok(Self::Mean),
            other => Err(format!("unknown pooling '{}', expected cls or mean", other)),
        }
    }
}

impl fmt::Display for Pooling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cls => "cls",
            Self::Mean => "mean",
        })
    }
}

impl Pooling {
    /// Known pooling of published sentence-transformers checkpoints.
    ///
    /// The `multi-qa-*-dot-*` family pools on `[CLS]`; the msmarco and
    /// `*-cos-*` checkpoints use mean pooling.
    pub fn for_model(model_id: &str) -> Self {
        let name = model_id.rsplit('/').next().unwrap_or(model_id);
        if name.starts_with("multi-qa-") && name.contains("-dot-") {
            Self::Cls
        } else {
            Self::Mean
        }
    }
}

/// Pooling plus the optional unit-length step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceHead {
    pub pooling: Pooling,
    pub normalize: bool,
}

#[derive(Debug, Deserialize)]
struct PoolingFile {
    #[serde(default)]
    pooling_mode_cls_token: bool,
    #[serde(default)]
    pooling_mode_mean_tokens: bool,
}

#[derive(Debug, Deserialize)]
struct ModuleEntry {
    #[serde(rename = "type")]
    kind: String,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> EmbeddingResult<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| EmbeddingError::Config(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| EmbeddingError::Config(format!("{}: {}", path.display(), e)))
}

impl SentenceHead {
    /// Resolve the head for a model directory.
    ///
    /// Explicit overrides win, then the exported module files, then
    /// [`Pooling::for_model`] and a `-cos-` name check for normalization.
    pub fn resolve(
        model_dir: &Path,
        model_id: &str,
        pooling: Option<Pooling>,
        normalize: Option<bool>,
    ) -> EmbeddingResult<Self> {
        let pooling = match pooling {
            Some(pooling) => pooling,
            None => match read_json::<PoolingFile>(&model_dir.join(POOLING_CONFIG_FILE))? {
                Some(file) if file.pooling_mode_cls_token => Pooling::Cls,
                Some(file) if file.pooling_mode_mean_tokens => Pooling::Mean,
                Some(_) => {
                    return Err(EmbeddingError::Config(format!(
                        "{} selects a pooling mode other than cls or mean",
                        POOLING_CONFIG_FILE
                    )));
                }
                None => Pooling::for_model(model_id),
            },
        };

        let normalize = match normalize {
            Some(normalize) => normalize,
            None => match read_json::<Vec<ModuleEntry>>(&model_dir.join(MODULES_FILE))? {
                Some(modules) => modules.iter().any(|m| m.kind.ends_with("Normalize")),
                None => model_id.contains("-cos-"),
            },
        };

        Ok(Self { pooling, normalize })
    }

    /// Collapse `[batch, seq, hidden]` token states into one vector per row.
    ///
    /// `mask` is the `[batch, seq]` attention mask used for the forward pass.
    pub fn pool_tokens(&self, hidden: ArrayView3<f32>, mask: ArrayView2<i64>) -> Vec<Vec<f32>> {
        hidden
            .outer_iter()
            .zip(mask.outer_iter())
            .map(|(tokens, row_mask)| match self.pooling {
                Pooling::Cls => tokens.index_axis(Axis(0), 0).to_vec(),
                Pooling::Mean => {
                    let mut pooled = vec![0.0f32; tokens.shape()[1]];
                    let mut weight = 0.0f32;
                    for (token, m) in tokens.outer_iter().zip(row_mask.iter()) {
                        let m = *m as f32;
                        weight += m;
                        for (slot, value) in pooled.iter_mut().zip(token.iter()) {
                            *slot += value * m;
                        }
                    }
                    pooled.iter_mut().for_each(|v| *v /= weight.max(1e-9));
                    pooled
                }
            })
            .collect()
    }
}
