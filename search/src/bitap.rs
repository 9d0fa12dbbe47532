//! Bitap 近似匹配
//!
//! 分数 = 错误数 / 模式长度 + 匹配位置偏离 / distance，不超过阈值才算匹配。
//! 模式长度超过 32 时按 32 字符分块分别匹配，分数取平均。

use std::collections::HashMap;

use crate::matcher::{normalize_case, MatchResult, Searcher};
use crate::models::SearchOptions;

/// 单块模式的最大长度（位掩码宽度）
pub const MAX_BITS: usize = 32;

/// 匹配分数下限，避免非完全匹配得到 0 分
const MIN_SCORE: f64 = 0.001;

struct Chunk {
    pattern: Vec<char>,
    alphabet: HashMap<char, u32>,
    start_index: usize,
}

/// Bitap 模糊匹配器
pub struct BitapSearch {
    pattern: String,
    chunks: Vec<Chunk>,
    options: SearchOptions,
}

impl BitapSearch {
    pub fn new(pattern: &str, options: SearchOptions) -> Self {
        let pattern = normalize_case(pattern, &options);
        let chars: Vec<char> = pattern.chars().collect();
        let mut chunks = Vec::new();

        let mut add_chunk = |slice: &[char], start_index: usize| {
            chunks.push(Chunk {
                pattern: slice.to_vec(),
                alphabet: pattern_alphabet(slice),
                start_index,
            });
        };

        let len = chars.len();
        if len > MAX_BITS {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                add_chunk(&chars[i..i + MAX_BITS], i);
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start_index = len - MAX_BITS;
                add_chunk(&chars[start_index..], start_index);
            }
        } else if len > 0 {
            add_chunk(&chars, 0);
        }

        Self { pattern, chunks, options }
    }
}

impl Searcher for BitapSearch {
    fn search_in(&self, text: &str) -> MatchResult {
        let text = normalize_case(text, &self.options);

        if self.pattern == text {
            return MatchResult::EXACT;
        }
        if self.chunks.is_empty() {
            return MatchResult::NO_MATCH;
        }

        let text: Vec<char> = text.chars().collect();
        let mut total_score = 0.0;
        let mut has_matches = false;

        for chunk in &self.chunks {
            let result = search(&text, chunk, &self.options);
            has_matches |= result.is_match;
            total_score += result.score;
        }

        if has_matches {
            MatchResult {
                is_match: true,
                score: total_score / self.chunks.len() as f64,
            }
        } else {
            MatchResult::NO_MATCH
        }
    }
}

/// 每个字符在模式中出现位置的位掩码
fn pattern_alphabet(pattern: &[char]) -> HashMap<char, u32> {
    let len = pattern.len();
    let mut mask = HashMap::new();
    for (i, &c) in pattern.iter().enumerate() {
        *mask.entry(c).or_insert(0) |= 1 << (len - i - 1);
    }
    mask
}

fn compute_score(
    pattern_len: usize,
    errors: usize,
    current_location: usize,
    expected_location: usize,
    options: &SearchOptions,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if options.ignore_location {
        return accuracy;
    }

    let proximity = current_location.abs_diff(expected_location);
    if options.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }

    accuracy + proximity as f64 / options.distance as f64
}

fn find_from(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if from > text.len() || pattern.len() > text.len() - from {
        return None;
    }
    text[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|offset| from + offset)
}

/// 是否存在不短于 `min_len` 的连续匹配字符
fn has_long_enough_run(match_mask: &[bool], min_len: usize) -> bool {
    let mut run = 0;
    for &matched in match_mask {
        run = if matched { run + 1 } else { 0 };
        if run >= min_len {
            return true;
        }
    }
    false
}

fn search(text: &[char], chunk: &Chunk, options: &SearchOptions) -> MatchResult {
    let pattern = &chunk.pattern;
    let pattern_len = pattern.len();
    let text_len = text.len();
    let location = options.location + chunk.start_index;
    let expected_location = location.min(text_len);

    let compute_matches = options.min_match_char_length > 1;
    let mut match_mask = vec![false; if compute_matches { text_len } else { 0 }];

    let mut current_threshold = options.threshold;

    // 先找精确出现的位置，用来收紧阈值
    let mut from = expected_location;
    while let Some(index) = find_from(text, pattern, from) {
        let score = compute_score(pattern_len, 0, index, expected_location, options);
        current_threshold = current_threshold.min(score);
        from = index + pattern_len;

        if compute_matches {
            for flag in &mut match_mask[index..index + pattern_len] {
                *flag = true;
            }
        }
    }

    let mut best_location: Option<usize> = None;
    let mut final_score = 1.0;
    let mut last_bit_arr: Vec<u32> = Vec::new();
    let mut bin_max = pattern_len + text_len;
    let mask: u32 = 1 << (pattern_len - 1);

    for errors in 0..pattern_len {
        // 二分查找当前错误数下允许偏离的最大距离
        let mut bin_min = 0;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            let score = compute_score(
                pattern_len,
                errors,
                expected_location + bin_mid,
                expected_location,
                options,
            );
            if score <= current_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid;

        let mut start = (expected_location + 1).saturating_sub(bin_mid).max(1);
        let finish = if options.find_all_matches {
            text_len
        } else {
            (expected_location + bin_mid).min(text_len) + pattern_len
        };

        let mut bit_arr = vec![0u32; finish + 2];
        bit_arr[finish + 1] = (1u32 << errors) - 1;

        let mut j = finish;
        while j >= start {
            let current_location = j - 1;
            let char_match = text
                .get(current_location)
                .and_then(|c| chunk.alphabet.get(c))
                .copied()
                .unwrap_or(0);

            if compute_matches && current_location < text_len {
                match_mask[current_location] |= char_match != 0;
            }

            bit_arr[j] = ((bit_arr[j + 1] << 1) | 1) & char_match;

            if errors > 0 {
                let last_next = last_bit_arr.get(j + 1).copied().unwrap_or(0);
                let last_here = last_bit_arr.get(j).copied().unwrap_or(0);
                bit_arr[j] |= ((last_next | last_here) << 1) | 1 | last_next;
            }

            if bit_arr[j] & mask != 0 {
                final_score = compute_score(pattern_len, errors, current_location, expected_location, options);

                if final_score <= current_threshold {
                    current_threshold = final_score;
                    best_location = Some(current_location);

                    if current_location <= expected_location {
                        break;
                    }

                    // 已经越过期望位置，后续只需检查对称的一侧
                    start = (2 * expected_location).saturating_sub(current_location).max(1);
                }
            }

            j -= 1;
        }

        let score = compute_score(pattern_len, errors + 1, expected_location, expected_location, options);
        if score > current_threshold {
            break;
        }

        last_bit_arr = bit_arr;
    }

    let mut is_match = best_location.is_some();
    if compute_matches && !has_long_enough_run(&match_mask, options.min_match_char_length) {
        is_match = false;
    }

    MatchResult {
        is_match,
        score: final_score.max(MIN_SCORE),
    }
}
