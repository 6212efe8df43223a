//! 입력기 설정 (TOML)
//!
//! 파일을 읽는 일은 호출자가 하고, 여기서는 문자열만 해석한다.
//!
//! ```toml
//! hangul_keyboard = "39"
//! latin_keyboard = "dvorak"
//! output_mode = "jamo"
//! check_charset = true
//! charset = "euc-kr"
//! commit_by_word = false
//! trigger_keys = ["Hangul", "Shift+space"]
//! off_keys = ["Escape"]
//! compose_map = """
//! Name: 기본
//! U1100 U1100 U1101
//! """
//! ```

use log::debug;
use serde::Deserialize;

use crate::automata::OutputMode;
use crate::error::Result;
use crate::keysym::KeySpec;

/// 한글 자판 아래에 놓인 라틴 자판
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatinKeyboard {
    /// 쿼티 (재배치 없음)
    #[default]
    #[serde(alias = "qwerty")]
    None,
    Dvorak,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 내장 자판 id (`"2"`, `"39"`)
    pub hangul_keyboard: String,
    pub latin_keyboard: LatinKeyboard,
    pub output_mode: OutputMode,
    /// 조합 결과를 `charset`으로 표현할 수 있을 때만 조합
    pub check_charset: bool,
    pub charset: String,
    /// 단어 단위로 확정
    pub commit_by_word: bool,
    /// 한/영 전환 키
    pub trigger_keys: Vec<String>,
    /// 한글 모드를 끄고 키를 넘기는 키
    pub off_keys: Vec<String>,
    /// 조합 맵 문서 ([`ComposeTable::from_compose_map`](crate::compose::ComposeTable::from_compose_map)).
    /// 없으면 자판의 조합 규칙을 쓴다.
    pub compose_map: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hangul_keyboard: "2".to_string(),
            latin_keyboard: LatinKeyboard::None,
            output_mode: OutputMode::Syllable,
            check_charset: false,
            charset: "euc-kr".to_string(),
            commit_by_word: false,
            trigger_keys: vec!["Hangul".to_string(), "Shift+space".to_string()],
            off_keys: vec!["Escape".to_string()],
            compose_map: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        debug!("config loaded: {config:?}");
        Ok(config)
    }

    pub fn trigger_key_specs(&self) -> Result<Vec<KeySpec>> {
        parse_key_specs(&self.trigger_keys)
    }

    pub fn off_key_specs(&self) -> Result<Vec<KeySpec>> {
        parse_key_specs(&self.off_keys)
    }
}

fn parse_key_specs(names: &[String]) -> Result<Vec<KeySpec>> {
    names.iter().map(|name| name.parse()).collect()
}
