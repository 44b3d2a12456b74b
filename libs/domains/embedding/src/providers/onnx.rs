//! Local sentence-transformer inference through ONNX Runtime.
//!
//! A model directory holds `model.onnx` (a transformer exported with
//! `input_ids`/`attention_mask` inputs, optionally `token_type_ids`) and the
//! matching HuggingFace `tokenizer.json`. Token states go through the model's
//! [`SentenceHead`] (pooling plus optional normalization); graphs that already
//! emit pooled sentence vectors are passed through.

use async_trait::async_trait;
use ndarray::{ArrayView2, ArrayView3};
use ort::ep;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::pooling::{Pooling, SentenceHead};
use super::provider::{EmbeddingProvider, l2_normalize};
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::ModelInfo;

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    pub model_dir: PathBuf,
    pub model_id: String,
    pub max_seq_length: usize,
    /// Overrides the pooling read from the model directory
    pub pooling: Option<Pooling>,
    /// Overrides the `Normalize` module detection
    pub normalize: Option<bool>,
    pub intra_threads: usize,
    /// Independent inference sessions; each holds its own copy of the weights
    pub sessions: usize,
}

fn model_err<E: Display>(err: E) -> EmbeddingError {
    EmbeddingError::Model(err.to_string())
}

fn require_file(path: &Path) -> EmbeddingResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EmbeddingError::Config(format!(
            "model file not found: {}",
            path.display()
        )))
    }
}

/// Fixed set of exclusive slots handed out round-robin.
///
/// A caller takes the first free slot after its turn and only waits when
/// every slot is busy.
pub(crate) struct SessionPool<T> {
    slots: Vec<Mutex<T>>,
    next: AtomicUsize,
}

impl<T> SessionPool<T> {
    pub(crate) fn new(items: Vec<T>) -> EmbeddingResult<Self> {
        if items.is_empty() {
            return Err(EmbeddingError::Config(
                "at least one inference session is required".to_string(),
            ));
        }
        Ok(Self {
            slots: items.into_iter().map(Mutex::new).collect(),
            next: AtomicUsize::new(0),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn acquire(&self) -> EmbeddingResult<MutexGuard<'_, T>> {
        let poisoned = || EmbeddingError::Model("inference session poisoned".to_string());
        let start = self.next.fetch_add(1, Ordering::Relaxed) % self.slots.len();

        for offset in 0..self.slots.len() {
            match self.slots[(start + offset) % self.slots.len()].try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
            }
        }

        self.slots[start].lock().map_err(|_| poisoned())
    }
}

struct OnnxModel {
    sessions: SessionPool<Session>,
    tokenizer: Tokenizer,
    uses_token_type_ids: bool,
    head: SentenceHead,
}

impl OnnxModel {
    fn encode(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = texts
            .iter()
            .map(|text| self.tokenizer.encode(text.as_str(), true).map_err(model_err))
            .collect::<EmbeddingResult<Vec<_>>>()?;

        let batch = texts.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0)
            .max(1);

        // Right-pad every sequence to the longest one in the batch.
        let mut input_ids = Vec::with_capacity(batch * max_len);
        let mut attention_mask = Vec::with_capacity(batch * max_len);
        for encoding in &encodings {
            let ids = encoding.get_ids();
            let padding = max_len - ids.len();
            input_ids.extend(ids.iter().map(|&id| i64::from(id)));
            input_ids.extend(std::iter::repeat_n(0i64, padding));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| i64::from(m)));
            attention_mask.extend(std::iter::repeat_n(0i64, padding));
        }
        let mask = ArrayView2::from_shape((batch, max_len), &attention_mask).map_err(model_err)?;

        let shape = [batch, max_len];
        let ids_tensor = Tensor::from_array((shape, input_ids)).map_err(model_err)?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.clone())).map_err(model_err)?;

        let mut session = self.sessions.acquire()?;
        let run_result = if self.uses_token_type_ids {
            let type_tensor =
                Tensor::from_array((shape, vec![0i64; batch * max_len])).map_err(model_err)?;
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor
            ])
        };
        let outputs = run_result.map_err(model_err)?;

        // Output names differ between exports, the first output is the hidden state.
        let (out_shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(model_err)?;
        let dims: Vec<usize> = out_shape.iter().map(|&d| d.max(0) as usize).collect();

        let mut embeddings = match dims.as_slice() {
            &[b, seq, hidden] if b == batch && seq <= max_len => {
                let tokens = ArrayView3::from_shape((b, seq, hidden), data).map_err(model_err)?;
                let mask = mask.slice(ndarray::s![.., ..seq]);
                self.head.pool_tokens(tokens, mask)
            }
            &[b, hidden] if b == batch => ArrayView2::from_shape((b, hidden), data)
                .map_err(model_err)?
                .outer_iter()
                .map(|row| row.to_vec())
                .collect(),
            other => {
                return Err(EmbeddingError::InvalidOutput(format!(
                    "unsupported output shape {:?} for batch of {}",
                    other, batch
                )));
            }
        };

        if self.head.normalize {
            embeddings.iter_mut().for_each(|v| l2_normalize(v));
        }

        Ok(embeddings)
    }
}

fn build_session(model_path: &Path, intra_threads: usize) -> EmbeddingResult<Session> {
    Session::builder()
        .map_err(model_err)?
        .with_execution_providers([ep::CPU::default().build()])
        .map_err(model_err)?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(model_err)?
        .with_intra_threads(intra_threads)
        .map_err(model_err)?
        .commit_from_file(model_path)
        .map_err(model_err)
}

/// Sentence-embedding model evaluated in-process on the CPU.
///
/// Inference runs on Tokio's blocking pool so request handlers never stall
/// the async workers. Concurrent callers spread over the configured sessions.
#[derive(Clone)]
pub struct OnnxProvider {
    model: Arc<OnnxModel>,
    info: ModelInfo,
}

impl OnnxProvider {
    /// Load the model and tokenizer, then run one warm-up inference to learn the
    /// output dimension. Blocking; call from `spawn_blocking` inside a runtime.
    pub fn load(config: &OnnxConfig) -> EmbeddingResult<Self> {
        let model_path = config.model_dir.join(MODEL_FILE);
        let tokenizer_path = config.model_dir.join(TOKENIZER_FILE);
        require_file(&model_path)?;
        require_file(&tokenizer_path)?;

        let head = SentenceHead::resolve(
            &config.model_dir,
            &config.model_id,
            config.pooling,
            config.normalize,
        )?;

        info!(
            model = %config.model_id,
            path = %model_path.display(),
            sessions = config.sessions,
            pooling = %head.pooling,
            normalize = head.normalize,
            "Loading ONNX embedding model"
        );

        let sessions = (0..config.sessions.max(1))
            .map(|_| build_session(&model_path, config.intra_threads))
            .collect::<EmbeddingResult<Vec<_>>>()?;
        let sessions = SessionPool::new(sessions)?;

        let uses_token_type_ids = sessions
            .acquire()?
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");
        debug!(uses_token_type_ids, "Inspected model inputs");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(model_err)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_length,
                ..Default::default()
            }))
            .map_err(model_err)?;
        tokenizer.with_padding(None);

        let model = OnnxModel {
            sessions,
            tokenizer,
            uses_token_type_ids,
            head,
        };

        let dimension = model
            .encode(&["dimension check".to_string()])?
            .first()
            .map(Vec::len)
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                EmbeddingError::InvalidOutput("warm-up inference returned no vector".to_string())
            })?;

        info!(
            model = %config.model_id,
            dimension,
            max_seq_length = config.max_seq_length,
            sessions = model.sessions.len(),
            "ONNX embedding model ready"
        );

        Ok(Self {
            model: Arc::new(model),
            info: ModelInfo {
                model_id: config.model_id.clone(),
                dimension,
                max_seq_length: config.max_seq_length,
            },
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxProvider {
    fn info(&self) -> ModelInfo {
        self.info.clone()
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidOutput("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || model.encode(&texts)).await?
    }
}
