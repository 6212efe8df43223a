/// 오토마타 트레잇, 조합 버퍼, 기본 연산, 자판 종류별 선택
pub mod jamo;
pub mod jaso;

use log::{debug, warn};
use serde::Deserialize;

use crate::charset::{self, CharsetOracle};
use crate::compose::ComposeTable;
use crate::keysym::{Keysym, XK_BACKSPACE};
use crate::layout::KeyboardKind;
use crate::unicode;

pub use jamo::JamoAutomata;
pub use jaso::JasoAutomata;

/// 되돌리기 스택 크기
pub const STACK_CAPACITY: usize = 12;

/// 키 하나를 처리한 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 새 음절을 시작했다 (미리보기 삽입)
    Insert,
    /// 조합 중인 음절을 고쳤다 (미리보기 갱신)
    Update,
    /// 조합 없이 바로 확정했다 (세벌식 기호 키)
    Commit,
    /// 한글로 처리하지 않았다. 호출자가 키를 응용 프로그램에 넘긴다.
    NotConsumed,
}

impl Transition {
    pub fn is_consumed(self) -> bool {
        self != Transition::NotConsumed
    }
}

/// 미리보기/확정 문자열 형식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// 완성형 음절, 음절이 안 되면 호환 자모
    #[default]
    Syllable,
    /// 첫가끝 자모 (빈 자리는 채움 문자)
    Jamo,
}

/// 초성/중성/종성 자리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Choseong,
    Jungseong,
    Jongseong,
}

impl Slot {
    pub fn of(ch: char) -> Option<Slot> {
        if unicode::is_choseong(ch) {
            Some(Slot::Choseong)
        } else if unicode::is_jungseong(ch) {
            Some(Slot::Jungseong)
        } else if unicode::is_jongseong(ch) {
            Some(Slot::Jongseong)
        } else {
            None
        }
    }

    pub fn contains(self, ch: char) -> bool {
        Slot::of(ch) == Some(self)
    }
}

/// 오토마타에 들어가는 키 하나: 원래 키심과 자판으로 바꾼 문자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub keysym: Keysym,
    pub ch: Option<char>,
}

impl KeyInput {
    pub fn new(keysym: Keysym, ch: Option<char>) -> Self {
        KeyInput { keysym, ch }
    }

    /// 자판을 거치지 않은 자모 입력 (유니코드 키심과 같다)
    pub fn jamo(ch: char) -> Self {
        KeyInput {
            keysym: crate::keysym::keysym_from_unicode(ch),
            ch: Some(ch),
        }
    }

    pub fn backspace() -> Self {
        KeyInput {
            keysym: XK_BACKSPACE,
            ch: None,
        }
    }

    pub fn is_backspace(&self) -> bool {
        self.keysym == XK_BACKSPACE
    }
}

/// 조합 버퍼: 조합 중인 초/중/종성과 되돌리기 스택
#[derive(Debug, Clone, Default)]
pub struct SyllableBuffer {
    pub choseong: Option<char>,
    pub jungseong: Option<char>,
    pub jongseong: Option<char>,
    stack: [char; STACK_CAPACITY],
    depth: usize,
}

impl SyllableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.choseong.is_none() && self.jungseong.is_none() && self.jongseong.is_none()
    }

    pub fn slot(&self, slot: Slot) -> Option<char> {
        match slot {
            Slot::Choseong => self.choseong,
            Slot::Jungseong => self.jungseong,
            Slot::Jongseong => self.jongseong,
        }
    }

    pub fn set_slot(&mut self, slot: Slot, value: Option<char>) {
        match slot {
            Slot::Choseong => self.choseong = value,
            Slot::Jungseong => self.jungseong = value,
            Slot::Jongseong => self.jongseong = value,
        }
    }

    /// 스택이 가득 차면 `false`를 돌려주고 아무것도 하지 않는다.
    pub fn push(&mut self, ch: char) -> bool {
        if self.depth == STACK_CAPACITY {
            return false;
        }
        self.stack[self.depth] = ch;
        self.depth += 1;
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.depth = self.depth.checked_sub(1)?;
        Some(self.stack[self.depth])
    }

    pub fn peek(&self) -> Option<char> {
        self.history().last().copied()
    }

    /// 마지막 확정 이후 쌓인 조합 단계 (오래된 것부터)
    pub fn history(&self) -> &[char] {
        &self.stack[..self.depth]
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_saturated(&self) -> bool {
        self.depth == STACK_CAPACITY
    }

    pub fn clear(&mut self) {
        self.choseong = None;
        self.jungseong = None;
        self.jongseong = None;
        self.depth = 0;
    }

    /// 현재 조합 상태를 출력 형식에 맞춰 문자열로 만든다.
    pub fn render(&self, mode: OutputMode) -> String {
        let mut text = String::new();
        if self.is_empty() {
            return text;
        }
        match mode {
            OutputMode::Syllable => {
                if let (Some(cho), Some(jung)) = (self.choseong, self.jungseong)
                    && let Some(syllable) = unicode::compose_syllable(cho, jung, self.jongseong)
                {
                    text.push(syllable);
                    return text;
                }
                // 음절이 되지 않으면 자리마다 호환 자모로 표시
                text.extend(
                    [self.choseong, self.jungseong, self.jongseong]
                        .into_iter()
                        .flatten()
                        .map(unicode::jamo_to_compat),
                );
            }
            OutputMode::Jamo => {
                text.push(self.choseong.unwrap_or(unicode::CHOSEONG_FILLER));
                text.push(self.jungseong.unwrap_or(unicode::JUNGSEONG_FILLER));
                if let Some(jong) = self.jongseong {
                    text.push(jong);
                }
            }
        }
        text
    }
}

/// 오토마타 규칙이 쓰는 기본 연산 모음.
///
/// 조합 버퍼, 조합 테이블, 문자셋 오라클, 확정 문자열 수집처를 빌려 묶는다.
pub struct Composer<'a> {
    buffer: &'a mut SyllableBuffer,
    compose: &'a ComposeTable,
    oracle: Option<&'a dyn CharsetOracle>,
    output: OutputMode,
    committed: &'a mut Vec<String>,
}

impl<'a> Composer<'a> {
    pub fn new(
        buffer: &'a mut SyllableBuffer,
        compose: &'a ComposeTable,
        output: OutputMode,
        committed: &'a mut Vec<String>,
    ) -> Self {
        Composer {
            buffer,
            compose,
            oracle: None,
            output,
            committed,
        }
    }

    /// 문자셋 검사를 켠다. `None`이면 끈다.
    pub fn with_charset(mut self, oracle: Option<&'a dyn CharsetOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn charset_check_enabled(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn buffer(&self) -> &SyllableBuffer {
        self.buffer
    }

    pub fn slot(&self, slot: Slot) -> Option<char> {
        self.buffer.slot(slot)
    }

    pub fn set(&mut self, slot: Slot, ch: Option<char>) {
        self.buffer.set_slot(slot, ch);
    }

    pub fn push(&mut self, ch: char) {
        if !self.buffer.push(ch) {
            // 다음 자모가 오기 전에 확정되므로 여기까지 오지 않는다
            warn!("undo stack saturated, dropping U+{:04X} from history", ch as u32);
        }
    }

    pub fn pop(&mut self) -> Option<char> {
        self.buffer.pop()
    }

    pub fn peek(&self) -> Option<char> {
        self.buffer.peek()
    }

    /// 조합 테이블 조회
    pub fn compose(&self, first: char, last: char) -> Option<char> {
        self.compose.lookup(first, last)
    }

    /// 문자셋 검사. 검사가 꺼져 있으면 항상 통과.
    pub fn check_charset(&self, cho: Option<char>, jung: Option<char>, jong: Option<char>) -> bool {
        let Some(oracle) = self.oracle else {
            return true;
        };
        let ok = charset::check_syllable(oracle, cho, jung, jong);
        if !ok {
            debug!("charset rejects candidate {cho:?} {jung:?} {jong:?}");
        }
        ok
    }

    /// 조합 중인 음절을 확정하고 버퍼를 비운다.
    pub fn commit(&mut self) {
        if !self.buffer.is_empty() {
            self.committed.push(self.buffer.render(self.output));
        }
        self.buffer.clear();
    }

    /// 조합과 상관없는 문자를 그대로 확정한다.
    pub fn commit_char(&mut self, ch: char) {
        self.committed.push(ch.to_string());
    }

    /// 자리를 채우고 스택에 쌓는다.
    pub fn fill(&mut self, slot: Slot, ch: char) {
        self.set(slot, Some(ch));
        self.push(ch);
    }

    /// 앞 음절을 확정하고 `ch`로 새 음절을 시작한다.
    pub fn restart(&mut self, slot: Slot, ch: char) -> Transition {
        self.commit();
        self.fill(slot, ch);
        Transition::Insert
    }

    /// 스택을 한 단계 되돌린다. 스택이 비어 있으면 키를 넘긴다.
    pub fn backspace(&mut self) -> Transition {
        let Some(popped) = self.buffer.pop() else {
            return Transition::NotConsumed;
        };
        let Some(slot) = Slot::of(popped) else {
            return Transition::NotConsumed;
        };
        // 같은 자리의 직전 단계가 있으면 복원, 없으면 비운다
        let restored = self.buffer.peek().filter(|&prev| slot.contains(prev));
        self.buffer.set_slot(slot, restored);
        Transition::Update
    }

    /// 조합이 불가능한 키: 백스페이스가 아니면 조합을 확정한다.
    fn flush_for(&mut self, input: &KeyInput) -> Option<Transition> {
        if input.is_backspace() {
            return Some(self.backspace());
        }
        self.commit();
        None
    }

    /// 다음 자모를 받기 전에 스택이 가득 찼으면 확정하고 새로 시작한다.
    fn ensure_room(&mut self) {
        if self.buffer.is_saturated() {
            warn!("undo stack full ({STACK_CAPACITY}), committing pending syllable");
            self.commit();
        }
    }
}

/// 두벌식/세벌식 공통 인터페이스
pub trait Automata {
    /// 키 하나를 처리한다.
    fn process(&self, composer: &mut Composer<'_>, input: KeyInput) -> Transition;
}

/// 자판 종류에 따라 고른 오토마타
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Automaton {
    TwoSet(JamoAutomata),
    ThreeSet(JasoAutomata),
}

impl Automaton {
    pub fn for_kind(kind: KeyboardKind) -> Self {
        match kind {
            KeyboardKind::TwoSet => Automaton::TwoSet(JamoAutomata),
            KeyboardKind::ThreeSet => Automaton::ThreeSet(JasoAutomata),
        }
    }

    pub fn kind(&self) -> KeyboardKind {
        match self {
            Automaton::TwoSet(_) => KeyboardKind::TwoSet,
            Automaton::ThreeSet(_) => KeyboardKind::ThreeSet,
        }
    }
}

impl Automata for Automaton {
    fn process(&self, composer: &mut Composer<'_>, input: KeyInput) -> Transition {
        match self {
            Automaton::TwoSet(automata) => automata.process(composer, input),
            Automaton::ThreeSet(automata) => automata.process(composer, input),
        }
    }
}
