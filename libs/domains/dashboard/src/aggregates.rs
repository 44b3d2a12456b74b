use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::queries::DefaultQuestion;

/// Canned (default) vs custom questions since the cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionMix {
    pub canned: i64,
    pub custom: i64,
}

pub fn question_mix(defaults: &[DefaultQuestion], total: i64) -> QuestionMix {
    let canned = defaults.iter().map(|d| d.cnt).sum::<i64>().min(total);
    QuestionMix {
        canned,
        custom: (total - canned).max(0),
    }
}

/// One equal-width time bin with a running total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u64,
    pub cumulative: u64,
}

/// Split `[min, max]` of `timestamps` into `bins` equal-width bins and count
/// each, with running totals. The last bin is closed on the right.
pub fn cumulative_histogram(timestamps: &[DateTime<Utc>], bins: usize) -> Vec<HistogramBin> {
    let (Some(min), Some(max)) = (timestamps.iter().min(), timestamps.iter().max()) else {
        return vec![];
    };
    let bins = bins.max(1);

    let span_ms = (*max - *min).num_milliseconds();
    if span_ms == 0 {
        return vec![HistogramBin {
            start: *min,
            end: *max,
            count: timestamps.len() as u64,
            cumulative: timestamps.len() as u64,
        }];
    }

    let width_ms = span_ms as f64 / bins as f64;
    let mut counts = vec![0u64; bins];
    for t in timestamps {
        let offset = (*t - *min).num_milliseconds() as f64;
        let index = ((offset / width_ms) as usize).min(bins - 1);
        counts[index] += 1;
    }

    let edge = |i: usize| *min + Duration::milliseconds((width_ms * i as f64).round() as i64);
    let mut running = 0;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            running += count;
            HistogramBin {
                start: edge(i),
                end: if i + 1 == bins { *max } else { edge(i + 1) },
                count,
                cumulative: running,
            }
        })
        .collect()
}
