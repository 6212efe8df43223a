//! 나비 한글 조합 오토마타
//!
//! X 키심과 수정키 상태를 받아 초성/중성/종성을 조합하고, 끝난 음절을
//! [`CommitSink`]로 보낸다. 두벌식과 세벌식 자판을 지원한다.
//!
//! ```
//! use std::sync::Arc;
//! use nabi_automata::{Engine, InputMode, KeyboardLayout, ModifierState, Settings};
//!
//! let engine = Arc::new(Engine::new(Settings::new(KeyboardLayout::builtin("2")?)));
//! let mut ctx = engine.create_context(Vec::<String>::new());
//! ctx.set_mode(InputMode::Compose);
//! for key in "gksrmf".chars() {
//!     ctx.process(key as u32, ModifierState::empty());
//! }
//! assert_eq!(ctx.sink(), &["한"]);
//! assert_eq!(ctx.peek_preedit(), "글");
//! # Ok::<(), nabi_automata::Error>(())
//! ```

pub mod automata;
pub mod charset;
pub mod compose;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod keysym;
pub mod layout;
pub mod stats;
pub mod unicode;

pub use automata::{Automata, Automaton, OutputMode, SyllableBuffer, Transition};
pub use charset::{AcceptAll, CharsetOracle, EncodingOracle};
pub use compose::{ComposeItem, ComposeTable};
pub use config::{Config, LatinKeyboard};
pub use context::{CommitSink, InputContext, InputMode};
pub use engine::{CommitGranularity, Engine, Settings};
pub use error::{Error, Result};
pub use keysym::{KeySpec, Keysym, ModifierState};
pub use layout::{KeyboardKind, KeyboardLayout, KeysymRemap};
pub use stats::{KeyStatistics, StatisticsSnapshot};
