//! 라틴 자판 재배치 (드보락 → 쿼티)
//!
//! 드보락 자판을 쓰는 사용자의 키심을 쿼티 위치의 키심으로 돌려 놓아
//! 한글 자판 배열이 물리 키 위치 그대로 동작하게 한다.

use crate::keysym::{self, Keysym, XK_EXCLAM};

/// 정렬된 (원래 키심, 바뀐 키심) 쌍 테이블
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysymRemap {
    name: String,
    pairs: Vec<(Keysym, Keysym)>,
}

/// `!`부터 `~`까지 드보락 키가 놓인 자리의 쿼티 키
const DVORAK_TO_QWERTY: &[u8; keysym::PRINTABLE_COUNT] =
    b"!Q#$%&q()*}w'e[0123456789ZzW]E{@ANIHDYUJGCVPMLSRXO:KF><BT?-\\=^\"`anihdyujgcvpmlsrxo;kf.,bt/_|+~";

impl KeysymRemap {
    pub fn new(name: impl Into<String>, pairs: impl IntoIterator<Item = (Keysym, Keysym)>) -> Self {
        let mut pairs: Vec<(Keysym, Keysym)> = pairs
            .into_iter()
            .filter(|(from, to)| from != to)
            .collect();
        pairs.sort_by_key(|&(from, _)| from);
        pairs.dedup_by_key(|&mut (from, _)| from);
        KeysymRemap {
            name: name.into(),
            pairs,
        }
    }

    pub fn dvorak() -> Self {
        let pairs = DVORAK_TO_QWERTY
            .iter()
            .enumerate()
            .map(|(i, &to)| (XK_EXCLAM + i as Keysym, to as Keysym));
        KeysymRemap::new("dvorak", pairs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 테이블에 없는 키심은 그대로 돌려준다.
    pub fn remap(&self, keysym: Keysym) -> Keysym {
        match self.pairs.binary_search_by_key(&keysym, |&(from, _)| from) {
            Ok(idx) => self.pairs[idx].1,
            Err(_) => keysym,
        }
    }
}
