//! 입력 컨텍스트: 커서 하나의 조합 상태
//!
//! 키를 거르고(한/영 전환, 수정키), 오토마타를 돌리고, 확정된 문자열을
//! [`CommitSink`]로 보낸다. 컨텍스트가 사라질 때 남은 조합은 확정된다.

use std::sync::Arc;

use log::trace;

use crate::automata::{Automata, Composer, KeyInput, SyllableBuffer, Transition};
use crate::engine::{CommitGranularity, Engine, Settings};
use crate::keysym::{Keysym, ModifierState, XK_BACKSPACE, XK_SHIFT_L, XK_SHIFT_R};

/// 확정된 문자열을 받는 쪽
pub trait CommitSink {
    fn commit(&mut self, text: &str);
}

impl<F> CommitSink for F
where
    F: FnMut(&str),
{
    fn commit(&mut self, text: &str) {
        self(text)
    }
}

impl CommitSink for Vec<String> {
    fn commit(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// 입력 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// 키를 그대로 넘긴다.
    #[default]
    Direct,
    /// 한글 조합
    Compose,
}

pub struct InputContext<S: CommitSink> {
    engine: Arc<Engine>,
    buffer: SyllableBuffer,
    /// 단어 단위 확정에서 아직 보내지 않은 음절. 확정된 단위 그대로 쌓는다.
    word: Vec<String>,
    mode: InputMode,
    sink: S,
}

impl<S: CommitSink> InputContext<S> {
    pub fn new(engine: Arc<Engine>, sink: S) -> Self {
        InputContext {
            engine,
            buffer: SyllableBuffer::new(),
            word: Vec::new(),
            mode: InputMode::Direct,
            sink,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// 조합 모드를 벗어나면 남은 조합을 확정한다.
    pub fn set_mode(&mut self, mode: InputMode) {
        if self.mode == InputMode::Compose && mode == InputMode::Direct {
            self.flush();
        }
        trace!("input mode {:?} → {mode:?}", self.mode);
        self.mode = mode;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn buffer(&self) -> &SyllableBuffer {
        &self.buffer
    }

    /// 키 하나를 처리한다.
    pub fn process(&mut self, keysym: Keysym, state: ModifierState) -> Transition {
        let settings = self.engine.snapshot();

        if settings.is_trigger_key(keysym, state) {
            let next = match self.mode {
                InputMode::Direct => InputMode::Compose,
                InputMode::Compose => InputMode::Direct,
            };
            self.set_mode(next);
            return Transition::Update;
        }
        if self.mode == InputMode::Direct {
            return Transition::NotConsumed;
        }

        // Shift 단독 입력은 조합을 끊지 않는다
        if keysym == XK_SHIFT_L || keysym == XK_SHIFT_R {
            return Transition::Update;
        }
        if settings.is_off_key(keysym, state) {
            self.set_mode(InputMode::Direct);
            return Transition::NotConsumed;
        }
        if state.intersects(ModifierState::COMMIT_MASK) {
            self.flush();
            return Transition::NotConsumed;
        }

        self.process_hangul(&settings, keysym, state)
    }

    fn process_hangul(&mut self, settings: &Settings, keysym: Keysym, state: ModifierState) -> Transition {
        let ch = settings.layout.map_key(keysym, state, settings.remap.as_ref());
        self.engine.statistics().record(keysym, state, ch);

        let mut segments = Vec::new();
        let transition = {
            let mut composer = Composer::new(
                &mut self.buffer,
                settings.compose_table(),
                settings.output,
                &mut segments,
            )
            .with_charset(settings.charset.as_deref());
            settings.automaton.process(&mut composer, KeyInput::new(keysym, ch))
        };
        trace!(
            "key 0x{keysym:04x} → {ch:?}: {transition:?}, committed {segments:?}, preedit {:?}",
            self.buffer.render(settings.output)
        );

        match settings.granularity {
            CommitGranularity::Syllable => {
                for text in &segments {
                    self.sink.commit(text);
                }
                transition
            }
            CommitGranularity::Word => self.collect_word(keysym, transition, segments),
        }
    }

    /// 단어 단위 확정: 한글 키 사이의 음절은 모아 두고 경계에서 한꺼번에 보낸다.
    fn collect_word(&mut self, keysym: Keysym, transition: Transition, segments: Vec<String>) -> Transition {
        match transition {
            Transition::Insert | Transition::Update => {
                self.word.extend(segments);
                transition
            }
            Transition::NotConsumed if keysym == XK_BACKSPACE && !self.word.is_empty() => {
                self.word.pop();
                Transition::Update
            }
            Transition::Commit | Transition::NotConsumed => {
                self.word.extend(segments);
                self.commit_word();
                transition
            }
        }
    }

    fn commit_word(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word).concat();
            self.sink.commit(&word);
        }
    }

    /// 현재 미리보기 문자열. 상태를 바꾸지 않는다.
    pub fn peek_preedit(&self) -> String {
        let settings = self.engine.snapshot();
        let mut text = self.word.concat();
        text.push_str(&self.buffer.render(settings.output));
        text
    }

    /// 남은 조합을 모두 확정해 보내고 그 문자열을 돌려준다.
    pub fn flush(&mut self) -> String {
        let settings = self.engine.snapshot();
        let mut text = std::mem::take(&mut self.word).concat();
        text.push_str(&self.buffer.render(settings.output));
        self.buffer.clear();
        if !text.is_empty() {
            trace!("flush {text:?}");
            self.sink.commit(&text);
        }
        text
    }

    /// 조합 상태를 비운다. 남은 조합은 버리지 않고 확정한다.
    pub fn reset(&mut self) {
        self.flush();
    }
}

impl<S: CommitSink> Drop for InputContext<S> {
    fn drop(&mut self) {
        self.flush();
    }
}
