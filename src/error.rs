/// 설정/레이아웃 로딩 시점의 오류
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON5 parse error: {0}")]
    LayoutParse(#[from] json5::Error),

    #[error("TOML parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid code point in {context}: {value:?}")]
    InvalidCodePoint { context: String, value: String },

    #[error("invalid keymap key {0:?}: expected a single printable ASCII character")]
    InvalidKey(String),

    #[error("compose rule U+{first:04X} + U+{second:04X} yields U+{result:04X}, not a conjoining jamo")]
    InvalidComposeResult { first: u32, second: u32, result: u32 },

    #[error("duplicate compose rule U+{first:04X} + U+{second:04X} in table {table:?}")]
    DuplicateCompose { table: String, first: u32, second: u32 },

    #[error("compose map line {line}: expected three code points, got {text:?}")]
    ComposeMapSyntax { line: usize, text: String },

    #[error("compose map has no \"Name:\" line")]
    MissingComposeMapName,

    #[error("unknown keyboard layout: {0:?}")]
    UnknownLayout(String),

    #[error("unknown charset: {0:?}")]
    UnknownCharset(String),

    #[error("invalid key specification: {0:?}")]
    InvalidKeySpec(String),
}

pub type Result<T> = std::result::Result<T, Error>;
