/// 엔진: 자판, 조합 규칙, 문자셋 검사, 출력 형식을 묶은 공유 설정
///
/// 설정은 `Arc<Settings>` 스냅샷으로 바꿔 끼운다. 키 하나를 처리하는 동안에는
/// 처음 가져온 스냅샷만 쓰므로 처리 중에 자판을 바꿔도 섞이지 않는다.
use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::automata::{Automaton, OutputMode};
use crate::charset::{CharsetOracle, EncodingOracle};
use crate::compose::ComposeTable;
use crate::config::{Config, LatinKeyboard};
use crate::context::{CommitSink, InputContext};
use crate::error::Result;
use crate::keysym::{KeySpec, Keysym, ModifierState, XK_ESCAPE, XK_HANGUL, XK_SPACE};
use crate::layout::{KeyboardLayout, KeysymRemap};
use crate::stats::KeyStatistics;

/// 확정 단위
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitGranularity {
    /// 음절이 끝날 때마다 확정
    #[default]
    Syllable,
    /// 한글이 아닌 키가 올 때까지 모아서 확정
    Word,
}

/// 한 시점의 엔진 설정. 만든 뒤에는 바뀌지 않는다.
#[derive(Clone)]
pub struct Settings {
    pub layout: Arc<KeyboardLayout>,
    pub automaton: Automaton,
    /// 자판의 조합 규칙 대신 쓸 조합 맵. 자판을 바꿔도 유지된다.
    pub compose: Option<Arc<ComposeTable>>,
    pub remap: Option<KeysymRemap>,
    pub output: OutputMode,
    /// `None`이면 문자셋 검사를 하지 않는다.
    pub charset: Option<Arc<dyn CharsetOracle>>,
    pub granularity: CommitGranularity,
    pub trigger_keys: Vec<KeySpec>,
    pub off_keys: Vec<KeySpec>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("layout", &self.layout.id)
            .field("automaton", &self.automaton)
            .field("compose", &self.compose_table().name())
            .field("remap", &self.remap.as_ref().map(KeysymRemap::name))
            .field("output", &self.output)
            .field("check_charset", &self.charset.is_some())
            .field("granularity", &self.granularity)
            .field("trigger_keys", &self.trigger_keys)
            .field("off_keys", &self.off_keys)
            .finish()
    }
}

impl Settings {
    /// 자판 하나로 기본 설정을 만든다.
    pub fn new(layout: KeyboardLayout) -> Self {
        Settings {
            automaton: Automaton::for_kind(layout.kind),
            layout: Arc::new(layout),
            compose: None,
            remap: None,
            output: OutputMode::Syllable,
            charset: None,
            granularity: CommitGranularity::Syllable,
            trigger_keys: vec![
                KeySpec::new(XK_HANGUL, ModifierState::empty()),
                KeySpec::new(XK_SPACE, ModifierState::SHIFT),
            ],
            off_keys: vec![KeySpec::new(XK_ESCAPE, ModifierState::empty())],
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let layout = KeyboardLayout::builtin(&config.hangul_keyboard)?;
        let charset: Option<Arc<dyn CharsetOracle>> = if config.check_charset {
            Some(Arc::new(EncodingOracle::new(&config.charset)?))
        } else {
            None
        };
        let compose = match &config.compose_map {
            Some(text) => Some(Arc::new(ComposeTable::from_compose_map(text)?)),
            None => None,
        };
        Ok(Settings {
            compose,
            remap: match config.latin_keyboard {
                LatinKeyboard::None => None,
                LatinKeyboard::Dvorak => Some(KeysymRemap::dvorak()),
            },
            output: config.output_mode,
            charset,
            granularity: if config.commit_by_word {
                CommitGranularity::Word
            } else {
                CommitGranularity::Syllable
            },
            trigger_keys: config.trigger_key_specs()?,
            off_keys: config.off_key_specs()?,
            ..Settings::new(layout)
        })
    }

    /// 자판을 바꾸면 오토마타도 자판 종류에 맞춰 바뀐다.
    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        self.automaton = Automaton::for_kind(layout.kind);
        self.layout = Arc::new(layout);
    }

    /// 지금 쓰는 조합 규칙: 조합 맵이 있으면 그것, 없으면 자판의 규칙
    pub fn compose_table(&self) -> &Arc<ComposeTable> {
        self.compose.as_ref().unwrap_or_else(|| self.layout.compose_table())
    }

    pub fn is_trigger_key(&self, keysym: Keysym, state: ModifierState) -> bool {
        self.trigger_keys.iter().any(|spec| spec.matches(keysym, state))
    }

    pub fn is_off_key(&self, keysym: Keysym, state: ModifierState) -> bool {
        self.off_keys.iter().any(|spec| spec.matches(keysym, state))
    }
}

/// 여러 입력 컨텍스트가 함께 쓰는 엔진 (thread-safe)
#[derive(Debug)]
pub struct Engine {
    settings: RwLock<Arc<Settings>>,
    stats: Arc<KeyStatistics>,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Engine {
            settings: RwLock::new(Arc::new(settings)),
            stats: Arc::new(KeyStatistics::new()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Engine::new(Settings::from_config(config)?))
    }

    /// 현재 설정 스냅샷
    pub fn snapshot(&self) -> Arc<Settings> {
        let settings = self.settings.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*settings)
    }

    fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut current = self.settings.write().unwrap_or_else(|e| e.into_inner());
        let mut next = Settings::clone(&current);
        f(&mut next);
        debug!("settings changed: {next:?}");
        *current = Arc::new(next);
    }

    /// 내장 자판으로 바꾼다. (`"2"`, `"39"`)
    pub fn set_keyboard(&self, id: &str) -> Result<()> {
        let layout = KeyboardLayout::builtin(id)?;
        self.set_layout(layout);
        Ok(())
    }

    pub fn set_layout(&self, layout: KeyboardLayout) {
        self.update(|s| s.set_layout(layout));
    }

    /// 조합 맵을 바꾼다. `None`이면 자판의 조합 규칙으로 돌아간다.
    pub fn set_compose_table(&self, compose: Option<Arc<ComposeTable>>) {
        self.update(|s| s.compose = compose);
    }

    pub fn set_output_mode(&self, output: OutputMode) {
        self.update(|s| s.output = output);
    }

    /// 문자셋 검사 오라클을 바꾼다. `None`이면 검사를 끈다.
    pub fn set_charset(&self, oracle: Option<Arc<dyn CharsetOracle>>) {
        self.update(|s| s.charset = oracle);
    }

    pub fn set_dvorak(&self, enabled: bool) {
        self.update(|s| s.remap = enabled.then(KeysymRemap::dvorak));
    }

    pub fn set_commit_granularity(&self, granularity: CommitGranularity) {
        self.update(|s| s.granularity = granularity);
    }

    /// 설정 전체를 다시 적용한다. 실패하면 기존 설정을 그대로 둔다.
    pub fn apply_config(&self, config: &Config) -> Result<()> {
        let settings = Settings::from_config(config)?;
        self.update(|s| *s = settings);
        Ok(())
    }

    pub fn statistics(&self) -> Arc<KeyStatistics> {
        Arc::clone(&self.stats)
    }

    /// 새 입력 컨텍스트를 만든다.
    pub fn create_context<S: CommitSink>(self: &Arc<Self>, sink: S) -> InputContext<S> {
        InputContext::new(Arc::clone(self), sink)
    }
}
