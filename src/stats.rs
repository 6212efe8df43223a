//! 키 입력 통계
//!
//! 자모별 횟수는 코드 포인트의 하위 바이트로 센다. 초성(U+1100~),
//! 중성(U+1161~), 종성(U+11A8~)의 하위 바이트는 서로 겹치지 않는다.

use std::sync::Mutex;

use crate::keysym::{Keysym, ModifierState, XK_BACKSPACE};
use crate::unicode;

/// 한 시점의 통계 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub total: u64,
    pub backspace: u64,
    pub shift: u64,
    pub jamo: [u64; 256],
}

impl Default for StatisticsSnapshot {
    fn default() -> Self {
        StatisticsSnapshot {
            total: 0,
            backspace: 0,
            shift: 0,
            jamo: [0; 256],
        }
    }
}

impl StatisticsSnapshot {
    /// 자모 하나가 입력된 횟수
    pub fn jamo_count(&self, ch: char) -> u64 {
        if unicode::is_jamo(ch) {
            self.jamo[jamo_index(ch)]
        } else {
            0
        }
    }
}

/// 한글 모드에서 처리한 키의 통계. 여러 입력 컨텍스트가 함께 쓴다.
#[derive(Debug, Default)]
pub struct KeyStatistics {
    inner: Mutex<StatisticsSnapshot>,
}

impl KeyStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 키 하나를 기록한다. `ch`는 자판이 바꾼 문자.
    pub fn record(&self, keysym: Keysym, state: ModifierState, ch: Option<char>) {
        let mut stats = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        stats.total += 1;
        if keysym == XK_BACKSPACE {
            stats.backspace += 1;
        }
        if state.contains(ModifierState::SHIFT) {
            stats.shift += 1;
        }
        if let Some(ch) = ch.filter(|&ch| unicode::is_jamo(ch)) {
            stats.jamo[jamo_index(ch)] += 1;
        }
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn reset(&self) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = StatisticsSnapshot::default();
    }
}

fn jamo_index(ch: char) -> usize {
    (ch as u32 & 0xff) as usize
}
