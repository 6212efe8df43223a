/// JSON5 자판 레이아웃 스키마용 serde 타입
use std::collections::HashMap;

use serde::Deserialize;

/// 자판 종류: 두벌식(2set) 또는 세벌식(3set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum KeyboardKind {
    #[serde(rename = "2set", alias = "jamo")]
    TwoSet,
    #[serde(rename = "3set", alias = "jaso")]
    ThreeSet,
}

/// 조합 규칙 항목 (겹자음/겹모음/겹받침)
#[derive(Debug, Clone, Deserialize)]
pub struct CombinationEntry {
    /// 첫째 자모 (16진수 문자열, 예: "0x1169")
    pub first: String,
    /// 둘째 자모 (16진수 문자열, 예: "0x1161")
    pub second: String,
    /// 결합 결과 (16진수 문자열, 예: "0x116A")
    pub result: String,
}

/// JSON5 레이아웃 최상위 스키마
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSchema {
    /// 레이아웃 식별자 (예: "2", "39")
    pub id: String,
    /// 레이아웃 이름 (예: "두벌식")
    pub name: String,
    /// 자판 종류
    #[serde(rename = "type")]
    pub kind: KeyboardKind,
    /// 키 → 자모 매핑 (ASCII 키 한 글자 → 16진수 코드포인트)
    pub keymap: HashMap<String, String>,
    /// 조합 규칙. 없으면 내장 표준 규칙을 쓴다.
    #[serde(default)]
    pub combinations: Option<Vec<CombinationEntry>>,
}
