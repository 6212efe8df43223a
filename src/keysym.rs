//! X11 키심(keysym) 상수와 수정키 상태
//!
//! 입력 서버가 넘겨주는 원시 키 이벤트는 `(keysym, state)` 쌍이다.
//! 여기서는 오토마타와 키 필터가 참조하는 최소한의 키심만 정의한다.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::{Error, Result};

pub type Keysym = u32;

pub const XK_SPACE: Keysym = 0x0020;
pub const XK_EXCLAM: Keysym = 0x0021;
pub const XK_ASCIITILDE: Keysym = 0x007e;
pub const XK_UPPER_A: Keysym = 0x0041;
pub const XK_UPPER_Z: Keysym = 0x005a;
pub const XK_LOWER_A: Keysym = 0x0061;
pub const XK_LOWER_Z: Keysym = 0x007a;

pub const XK_BACKSPACE: Keysym = 0xff08;
pub const XK_TAB: Keysym = 0xff09;
pub const XK_RETURN: Keysym = 0xff0d;
pub const XK_ESCAPE: Keysym = 0xff1b;
pub const XK_HANGUL: Keysym = 0xff31;
pub const XK_HANGUL_HANJA: Keysym = 0xff34;
pub const XK_HOME: Keysym = 0xff50;
pub const XK_LEFT: Keysym = 0xff51;
pub const XK_UP: Keysym = 0xff52;
pub const XK_RIGHT: Keysym = 0xff53;
pub const XK_DOWN: Keysym = 0xff54;
pub const XK_END: Keysym = 0xff57;
pub const XK_F1: Keysym = 0xffbe;
pub const XK_F12: Keysym = 0xffc9;
pub const XK_SHIFT_L: Keysym = 0xffe1;
pub const XK_SHIFT_R: Keysym = 0xffe2;
pub const XK_CONTROL_L: Keysym = 0xffe3;
pub const XK_CONTROL_R: Keysym = 0xffe4;
pub const XK_DELETE: Keysym = 0xffff;

/// 인쇄 가능한 ASCII 키심 개수 (`!` ~ `~`)
pub const PRINTABLE_COUNT: usize = (XK_ASCIITILDE - XK_EXCLAM + 1) as usize;

const UNICODE_KEYSYM_FLAG: Keysym = 0x0100_0000;

bitflags! {
    /// X11 수정키 상태 마스크
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierState: u32 {
        const SHIFT = 1 << 0;
        const LOCK = 1 << 1;
        const CONTROL = 1 << 2;
        const MOD1 = 1 << 3; // Alt
        const MOD2 = 1 << 4; // NumLock
        const MOD3 = 1 << 5;
        const MOD4 = 1 << 6; // Super
        const MOD5 = 1 << 7;
    }
}

impl ModifierState {
    /// 조합 중에 눌리면 조합을 확정하고 키를 넘겨야 하는 수정키
    pub const COMMIT_MASK: ModifierState = ModifierState::CONTROL
        .union(ModifierState::MOD1)
        .union(ModifierState::MOD3)
        .union(ModifierState::MOD4)
        .union(ModifierState::MOD5);
}

/// 유니코드 키심(`0x01xxxxxx`)이면 담긴 코드포인트를 돌려준다.
pub fn unicode_from_keysym(keysym: Keysym) -> Option<char> {
    if keysym & 0xff00_0000 == UNICODE_KEYSYM_FLAG {
        char::from_u32(keysym & 0x00ff_ffff)
    } else {
        None
    }
}

/// 문자를 유니코드 키심으로 변환한다.
pub fn keysym_from_unicode(ch: char) -> Keysym {
    let code = ch as u32;
    // Latin-1 영역은 키심과 코드포인트가 같다
    if (0x20..=0x7e).contains(&code) || (0xa0..=0xff).contains(&code) {
        code
    } else {
        UNICODE_KEYSYM_FLAG | code
    }
}

pub fn is_printable(keysym: Keysym) -> bool {
    (XK_EXCLAM..=XK_ASCIITILDE).contains(&keysym)
}

/// 조합 없이 바로 문자로 확정할 수 있는 키심 (스페이스, ASCII, Latin-1)
pub(crate) fn keysym_to_char(keysym: Keysym) -> Option<char> {
    if let Some(ch) = unicode_from_keysym(keysym) {
        return Some(ch);
    }
    if (0x20..=0x7e).contains(&keysym) || (0xa0..=0xff).contains(&keysym) {
        return char::from_u32(keysym);
    }
    None
}

const NAMED_KEYSYMS: &[(&str, Keysym)] = &[
    ("space", XK_SPACE),
    ("BackSpace", XK_BACKSPACE),
    ("Tab", XK_TAB),
    ("Return", XK_RETURN),
    ("Escape", XK_ESCAPE),
    ("Hangul", XK_HANGUL),
    ("Hangul_Hanja", XK_HANGUL_HANJA),
    ("Home", XK_HOME),
    ("Left", XK_LEFT),
    ("Up", XK_UP),
    ("Right", XK_RIGHT),
    ("Down", XK_DOWN),
    ("End", XK_END),
    ("Shift_L", XK_SHIFT_L),
    ("Shift_R", XK_SHIFT_R),
    ("Control_L", XK_CONTROL_L),
    ("Control_R", XK_CONTROL_R),
    ("Delete", XK_DELETE),
];

/// X 키심 이름("Hangul", "space", "F9", "a")을 키심 값으로 변환한다.
pub fn keysym_from_name(name: &str) -> Option<Keysym> {
    if let Some(&(_, keysym)) = NAMED_KEYSYMS.iter().find(|(n, _)| *n == name) {
        return Some(keysym);
    }
    if let Some(num) = name.strip_prefix('F')
        && let Ok(n) = num.parse::<u32>()
        && (1..=12).contains(&n)
    {
        return Some(XK_F1 + n - 1);
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if is_printable(ch as u32) => Some(ch as u32),
        _ => None,
    }
}

fn modifier_from_name(name: &str) -> Option<ModifierState> {
    match name {
        "Shift" => Some(ModifierState::SHIFT),
        "Control" | "Ctrl" => Some(ModifierState::CONTROL),
        "Alt" | "Mod1" => Some(ModifierState::MOD1),
        "Mod3" => Some(ModifierState::MOD3),
        "Super" | "Mod4" => Some(ModifierState::MOD4),
        "Mod5" => Some(ModifierState::MOD5),
        _ => None,
    }
}

/// 한/영 전환 키 같은 키 조합 (예: `"Shift+space"`)
///
/// 명시된 수정키만 비교하고 나머지 수정키는 무시한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub keysym: Keysym,
    pub modifiers: ModifierState,
}

impl KeySpec {
    pub const fn new(keysym: Keysym, modifiers: ModifierState) -> Self {
        KeySpec { keysym, modifiers }
    }

    pub fn matches(&self, keysym: Keysym, state: ModifierState) -> bool {
        self.keysym == keysym && state.intersection(self.modifiers) == self.modifiers
    }
}

impl FromStr for KeySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidKeySpec(s.to_string());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(invalid)?;
        let keysym = keysym_from_name(key).ok_or_else(invalid)?;

        let mut modifiers = ModifierState::empty();
        for part in parts {
            modifiers |= modifier_from_name(part).ok_or_else(invalid)?;
        }
        Ok(KeySpec { keysym, modifiers })
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, flag) in [
            ("Shift", ModifierState::SHIFT),
            ("Control", ModifierState::CONTROL),
            ("Mod1", ModifierState::MOD1),
            ("Mod3", ModifierState::MOD3),
            ("Mod4", ModifierState::MOD4),
            ("Mod5", ModifierState::MOD5),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match NAMED_KEYSYMS.iter().find(|(_, k)| *k == self.keysym) {
            Some((name, _)) => f.write_str(name),
            None if (XK_F1..=XK_F12).contains(&self.keysym) => {
                write!(f, "F{}", self.keysym - XK_F1 + 1)
            }
            None => match keysym_to_char(self.keysym) {
                Some(ch) => write!(f, "{ch}"),
                None => write!(f, "0x{:04x}", self.keysym),
            },
        }
    }
}
