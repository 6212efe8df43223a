//! 자모 조합 테이블
//!
//! 두 자모 쌍을 `first << 16 | last` 키로 묶어 정렬해 두고 이진 탐색한다.
//! 겹자음 초성(ㄲ), 겹모음(ㅘ), 겹받침(ㄳ) 규칙이 모두 여기 들어간다.

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::error::{Error, Result};
use crate::unicode;

/// 조합 규칙 하나
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeItem {
    pub key: u32,
    pub code: char,
}

impl ComposeItem {
    pub const fn new(first: char, last: char, code: char) -> Self {
        ComposeItem {
            key: make_key(first, last),
            code,
        }
    }

    pub fn first(&self) -> u32 {
        self.key >> 16
    }

    pub fn last(&self) -> u32 {
        self.key & 0xffff
    }
}

const fn make_key(first: char, last: char) -> u32 {
    (first as u32) << 16 | last as u32
}

/// 정렬된 조합 규칙 테이블. 생성 후에는 바뀌지 않는다.
#[derive(Debug, Clone)]
pub struct ComposeTable {
    name: String,
    items: Vec<ComposeItem>,
}

/// 표준 조합 규칙
static BUILTIN_ITEMS: &[(u32, u32, u32)] = &[
    (0x1100, 0x1100, 0x1101), // ㄱ + ㄱ = ㄲ
    (0x1103, 0x1103, 0x1104), // ㄷ + ㄷ = ㄸ
    (0x1107, 0x1107, 0x1108), // ㅂ + ㅂ = ㅃ
    (0x1109, 0x1109, 0x110A), // ㅅ + ㅅ = ㅆ
    (0x110C, 0x110C, 0x110D), // ㅈ + ㅈ = ㅉ
    (0x1169, 0x1161, 0x116A), // ㅗ + ㅏ = ㅘ
    (0x1169, 0x1162, 0x116B), // ㅗ + ㅐ = ㅙ
    (0x1169, 0x1175, 0x116C), // ㅗ + ㅣ = ㅚ
    (0x116E, 0x1165, 0x116F), // ㅜ + ㅓ = ㅝ
    (0x116E, 0x1166, 0x1170), // ㅜ + ㅔ = ㅞ
    (0x116E, 0x1175, 0x1171), // ㅜ + ㅣ = ㅟ
    (0x1173, 0x1175, 0x1174), // ㅡ + ㅣ = ㅢ
    (0x11A8, 0x11A8, 0x11A9), // ㄱ + ㄱ = ㄲ
    (0x11A8, 0x11BA, 0x11AA), // ㄱ + ㅅ = ㄳ
    (0x11AB, 0x11BD, 0x11AC), // ㄴ + ㅈ = ㄵ
    (0x11AB, 0x11C2, 0x11AD), // ㄴ + ㅎ = ㄶ
    (0x11AF, 0x11A8, 0x11B0), // ㄹ + ㄱ = ㄺ
    (0x11AF, 0x11B7, 0x11B1), // ㄹ + ㅁ = ㄻ
    (0x11AF, 0x11B8, 0x11B2), // ㄹ + ㅂ = ㄼ
    (0x11AF, 0x11BA, 0x11B3), // ㄹ + ㅅ = ㄽ
    (0x11AF, 0x11C0, 0x11B4), // ㄹ + ㅌ = ㄾ
    (0x11AF, 0x11C1, 0x11B5), // ㄹ + ㅍ = ㄿ
    (0x11AF, 0x11C2, 0x11B6), // ㄹ + ㅎ = ㅀ
    (0x11B8, 0x11BA, 0x11B9), // ㅂ + ㅅ = ㅄ
    (0x11BA, 0x11BA, 0x11BB), // ㅅ + ㅅ = ㅆ
];

impl ComposeTable {
    /// 규칙 목록으로 테이블을 만든다.
    /// 결과가 자모가 아니거나 같은 쌍이 두 번 나오면 거부한다.
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = ComposeItem>) -> Result<Self> {
        let name = name.into();
        let mut items: Vec<ComposeItem> = items.into_iter().collect();

        if let Some(bad) = items.iter().find(|item| !unicode::is_jamo(item.code)) {
            return Err(Error::InvalidComposeResult {
                first: bad.first(),
                second: bad.last(),
                result: bad.code as u32,
            });
        }

        items.sort_by_key(|item| item.key);
        if let Some(pair) = items.windows(2).find(|pair| pair[0].key == pair[1].key) {
            return Err(Error::DuplicateCompose {
                table: name,
                first: pair[0].first(),
                second: pair[0].last(),
            });
        }

        debug!("compose table {name:?}: {} rules", items.len());
        Ok(ComposeTable { name, items })
    }

    /// 조합 맵 문서를 해석한다.
    ///
    /// ```text
    /// # 주석
    /// Name: 옛한글
    /// U1100 U1100 U1101
    /// U11A8 U11BA U11AA
    /// ```
    ///
    /// 한 줄에 첫 자모, 둘째 자모, 결과를 16진수로 적는다. `Name:` 줄이 없으면
    /// 거부한다.
    pub fn from_compose_map(text: &str) -> Result<Self> {
        let mut name = None;
        let mut items = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Name:") {
                name = Some(rest.trim().to_string());
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let &[first, last, code] = fields.as_slice() else {
                return Err(Error::ComposeMapSyntax {
                    line: line_no,
                    text: line.to_string(),
                });
            };
            let parse = |field: &str| {
                parse_map_code(field).ok_or_else(|| Error::InvalidCodePoint {
                    context: format!("compose map line {line_no}"),
                    value: field.to_string(),
                })
            };
            items.push(ComposeItem::new(parse(first)?, parse(last)?, parse(code)?));
        }

        let name = name
            .filter(|name| !name.is_empty())
            .ok_or(Error::MissingComposeMapName)?;
        Self::new(name, items)
    }

    /// 내장 표준 조합 테이블 (공유 인스턴스)
    pub fn builtin() -> Arc<ComposeTable> {
        static BUILTIN: OnceLock<Arc<ComposeTable>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let items = BUILTIN_ITEMS.iter().filter_map(|&(first, last, code)| {
                    Some(ComposeItem::new(
                        char::from_u32(first)?,
                        char::from_u32(last)?,
                        char::from_u32(code)?,
                    ))
                });
                // 내장 규칙은 정렬되어 있고 중복이 없다
                let mut items: Vec<ComposeItem> = items.collect();
                items.sort_by_key(|item| item.key);
                Arc::new(ComposeTable {
                    name: "default".to_string(),
                    items,
                })
            })
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ComposeItem] {
        &self.items
    }

    /// 두 자모의 조합 결과. 규칙이 없으면 `None`.
    pub fn lookup(&self, first: char, last: char) -> Option<char> {
        let key = make_key(first, last);

        let (mut min, mut max) = (0usize, self.items.len());
        while min < max {
            let mid = min + (max - min) / 2;
            match self.items[mid].key.cmp(&key) {
                Ordering::Less => min = mid + 1,
                Ordering::Greater => max = mid,
                Ordering::Equal => return Some(self.items[mid].code),
            }
        }
        None
    }
}

/// `U1100`, `U+1100`, `0x1100`, `1100` 모두 받는다.
fn parse_map_code(field: &str) -> Option<char> {
    let hex = field
        .strip_prefix("U+")
        .or_else(|| field.strip_prefix('U'))
        .or_else(|| field.strip_prefix("0x"))
        .unwrap_or(field);
    let code = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(code)
}
