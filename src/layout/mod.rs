/// 자판 레이아웃 로딩 및 키심 → 자모 변환
pub mod remap;
pub mod schema;

use std::sync::Arc;

use log::debug;

use crate::compose::{ComposeItem, ComposeTable};
use crate::error::{Error, Result};
use crate::keysym::{self, Keysym, ModifierState, XK_EXCLAM};

pub use remap::KeysymRemap;
pub use schema::KeyboardKind;
use schema::LayoutSchema;

const LAYOUT_2_STANDARD: &str = include_str!("../../layouts/2-standard.json5");
const LAYOUT_3_390: &str = include_str!("../../layouts/3-390.json5");

/// 내장 레이아웃 (식별자, JSON5 원문)
const BUILTIN_LAYOUTS: &[(&str, &str)] = &[("2", LAYOUT_2_STANDARD), ("39", LAYOUT_3_390)];

/// 파싱된 자판 레이아웃
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    pub id: String,
    pub name: String,
    pub kind: KeyboardKind,
    /// `keysym - XK_exclam` 위치의 문자. 정의되지 않은 키는 자기 자신.
    keymap: [char; keysym::PRINTABLE_COUNT],
    compose: Arc<ComposeTable>,
}

/// 16진수 문자열("0x1100" 등)을 char로 변환
fn parse_hex_char(s: &str) -> Option<char> {
    let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    let code = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(code)
}

fn parse_code_point(context: &str, value: &str) -> Result<char> {
    parse_hex_char(value).ok_or_else(|| Error::InvalidCodePoint {
        context: context.to_string(),
        value: value.to_string(),
    })
}

/// 키맵의 키는 인쇄 가능한 ASCII 한 글자여야 한다.
fn parse_key_index(key: &str) -> Result<usize> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if keysym::is_printable(ch as Keysym) => {
            Ok((ch as Keysym - XK_EXCLAM) as usize)
        }
        _ => Err(Error::InvalidKey(key.to_string())),
    }
}

fn identity_keymap() -> [char; keysym::PRINTABLE_COUNT] {
    std::array::from_fn(|i| char::from(XK_EXCLAM as u8 + i as u8))
}

impl KeyboardLayout {
    /// JSON5 문자열에서 레이아웃을 파싱한다.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: LayoutSchema = json5::from_str(json)?;

        let mut keymap = identity_keymap();
        for (key, hex) in &schema.keymap {
            let idx = parse_key_index(key)?;
            keymap[idx] = parse_code_point(&format!("keymap[{key:?}]"), hex)?;
        }

        let compose = match &schema.combinations {
            None => ComposeTable::builtin(),
            Some(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for entry in entries {
                    let first = parse_code_point("combination first", &entry.first)?;
                    let second = parse_code_point("combination second", &entry.second)?;
                    let result = parse_code_point("combination result", &entry.result)?;
                    items.push(ComposeItem::new(first, second, result));
                }
                Arc::new(ComposeTable::new(schema.id.clone(), items)?)
            }
        };

        debug!(
            "loaded keyboard layout {:?} ({:?}, {} keys, compose table {:?})",
            schema.id,
            schema.kind,
            schema.keymap.len(),
            compose.name()
        );

        Ok(KeyboardLayout {
            id: schema.id,
            name: schema.name,
            kind: schema.kind,
            keymap,
            compose,
        })
    }

    /// 내장 레이아웃을 불러온다. (`"2"`: 두벌식, `"39"`: 세벌식 390)
    pub fn builtin(id: &str) -> Result<Self> {
        let (_, json) = BUILTIN_LAYOUTS
            .iter()
            .find(|(builtin_id, _)| *builtin_id == id)
            .ok_or_else(|| Error::UnknownLayout(id.to_string()))?;
        Self::from_json(json)
    }

    pub fn compose_table(&self) -> &Arc<ComposeTable> {
        &self.compose
    }

    /// 키 이벤트를 이 자판의 문자로 바꾼다.
    ///
    /// 1. 라틴 자판 재배치 (드보락 등)
    /// 2. 유니코드 키심은 담긴 문자를 그대로
    /// 3. 인쇄 가능한 ASCII는 Caps Lock을 무시하도록 대소문자를 맞춘 뒤 키맵 조회
    /// 4. 그 밖의 키는 `None`
    pub fn map_key(
        &self,
        keysym: Keysym,
        state: ModifierState,
        remap: Option<&KeysymRemap>,
    ) -> Option<char> {
        let keysym = match remap {
            Some(remap) => remap.remap(keysym),
            None => keysym,
        };

        if let Some(ch) = keysym::unicode_from_keysym(keysym) {
            return Some(ch);
        }
        if !keysym::is_printable(keysym) {
            return None;
        }

        let keysym = normalize_case(keysym, state);
        Some(self.keymap[(keysym - XK_EXCLAM) as usize])
    }

    /// ASCII 키 하나에 배정된 문자 (디버깅, 테스트용)
    pub fn keymap_char(&self, key: char) -> Option<char> {
        let code = key as Keysym;
        keysym::is_printable(code).then(|| self.keymap[(code - XK_EXCLAM) as usize])
    }
}

/// Caps Lock은 영문자에 한해 Shift의 효과를 뒤집는다. 결과적으로 Lock이
/// 켜져 있어도 Shift 상태만으로 대소문자가 정해진다.
fn normalize_case(keysym: Keysym, state: ModifierState) -> Keysym {
    if !state.contains(ModifierState::LOCK) {
        return keysym;
    }
    const CASE_OFFSET: Keysym = keysym::XK_LOWER_A - keysym::XK_UPPER_A;
    let shifted = state.contains(ModifierState::SHIFT);
    if shifted && (keysym::XK_LOWER_A..=keysym::XK_LOWER_Z).contains(&keysym) {
        keysym - CASE_OFFSET
    } else if !shifted && (keysym::XK_UPPER_A..=keysym::XK_UPPER_Z).contains(&keysym) {
        keysym + CASE_OFFSET
    } else {
        keysym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_JSON: &str = r#"{
        id: "test-2set",
        name: "테스트 두벌식",
        type: "2set",
        keymap: {
            "q": "0x1107",  // ㅂ
            "w": "0x110C",  // ㅈ
            "k": "0x1161",  // ㅏ
        },
        combinations: [
            { first: "0x1169", second: "0x1161", result: "0x116A" },  // ㅗ + ㅏ = ㅘ
        ],
    }"#;

    fn make_layout() -> KeyboardLayout {
        KeyboardLayout::from_json(MINIMAL_JSON).unwrap()
    }

    #[test]
    fn test_parse_layout() {
        let layout = make_layout();
        assert_eq!(layout.id, "test-2set");
        assert_eq!(layout.name, "테스트 두벌식");
        assert_eq!(layout.kind, KeyboardKind::TwoSet);
        assert_eq!(layout.keymap_char('q'), Some('\u{1107}'));
        assert_eq!(layout.keymap_char('w'), Some('\u{110C}'));
        assert_eq!(layout.compose_table().name(), "test-2set");
    }

    #[test]
    fn test_legacy_type_names() {
        let json = MINIMAL_JSON.replace("\"2set\"", "\"jaso\"");
        let layout = KeyboardLayout::from_json(&json).unwrap();
        assert_eq!(layout.kind, KeyboardKind::ThreeSet);
    }

    #[test]
    fn test_map_key() {
        let layout = make_layout();
        let none = ModifierState::empty();
        assert_eq!(layout.map_key('q' as Keysym, none, None), Some('\u{1107}'));
        assert_eq!(layout.map_key('k' as Keysym, none, None), Some('\u{1161}'));
        // 키맵에 없는 키는 자기 자신
        assert_eq!(layout.map_key('z' as Keysym, none, None), Some('z'));
        assert_eq!(layout.map_key(keysym::XK_RETURN, none, None), None);
        assert_eq!(layout.map_key(keysym::XK_SPACE, none, None), None);
    }

    #[test]
    fn test_map_key_caps_lock() {
        let layout = make_layout();
        let lock = ModifierState::LOCK;
        // Caps Lock만 켜진 'Q' → 'q'
        assert_eq!(layout.map_key('Q' as Keysym, lock, None), Some('\u{1107}'));
        // Caps Lock + Shift 'q' → 'Q'
        assert_eq!(
            layout.map_key('q' as Keysym, lock | ModifierState::SHIFT, None),
            Some('Q')
        );
        // 영문자가 아니면 그대로
        assert_eq!(layout.map_key('1' as Keysym, lock, None), Some('1'));
    }

    #[test]
    fn test_map_key_unicode_keysym() {
        let layout = make_layout();
        assert_eq!(
            layout.map_key(0x0100_1112, ModifierState::empty(), None),
            Some('\u{1112}')
        );
    }

    #[test]
    fn test_map_key_dvorak() {
        let layout = make_layout();
        let dvorak = KeysymRemap::dvorak();
        // 드보락 ''' 키는 쿼티 'q' 자리
        assert_eq!(
            layout.map_key('\'' as Keysym, ModifierState::empty(), Some(&dvorak)),
            Some('\u{1107}')
        );
    }

    #[test]
    fn test_layout_compose_rules() {
        let compose = make_layout().compose_table().clone();
        assert_eq!(compose.lookup('\u{1169}', '\u{1161}'), Some('\u{116A}'));
        // 레이아웃 규칙이 내장 규칙을 대체한다
        assert_eq!(compose.lookup('\u{1100}', '\u{1100}'), None);
    }

    #[test]
    fn test_missing_combinations_uses_builtin() {
        let json = r#"{ id: "x", name: "x", type: "2set", keymap: {} }"#;
        let layout = KeyboardLayout::from_json(json).unwrap();
        assert_eq!(layout.compose_table().lookup('\u{1100}', '\u{1100}'), Some('\u{1101}'));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            KeyboardLayout::from_json("not json"),
            Err(Error::LayoutParse(_))
        ));
    }

    #[test]
    fn test_invalid_keymap_entries() {
        let bad_key = r#"{ id: "x", name: "x", type: "2set", keymap: { "qq": "0x1107" } }"#;
        assert!(matches!(
            KeyboardLayout::from_json(bad_key),
            Err(Error::InvalidKey(_))
        ));
        let bad_hex = r#"{ id: "x", name: "x", type: "2set", keymap: { "q": "1107" } }"#;
        assert!(matches!(
            KeyboardLayout::from_json(bad_hex),
            Err(Error::InvalidCodePoint { .. })
        ));
    }

    #[test]
    fn test_parse_hex_char() {
        assert_eq!(parse_hex_char("0x3131"), Some('ㄱ'));
        assert_eq!(parse_hex_char("0xAC00"), Some('가'));
        assert_eq!(parse_hex_char("invalid"), None);
    }

    #[test]
    fn test_builtin_layouts() {
        let two = KeyboardLayout::builtin("2").unwrap();
        assert_eq!(two.kind, KeyboardKind::TwoSet);
        assert_eq!(two.keymap_char('r'), Some('\u{1100}'));
        assert_eq!(two.keymap_char('R'), Some('\u{1101}'));
        assert_eq!(two.keymap_char('1'), Some('1'));

        let three = KeyboardLayout::builtin("39").unwrap();
        assert_eq!(three.kind, KeyboardKind::ThreeSet);
        assert_eq!(three.keymap_char('k'), Some('\u{1100}'));
        assert_eq!(three.keymap_char('x'), Some('\u{11A8}'));
        assert_eq!(three.keymap_char('<'), Some('2'));

        assert!(matches!(
            KeyboardLayout::builtin("32"),
            Err(Error::UnknownLayout(_))
        ));
    }
}
