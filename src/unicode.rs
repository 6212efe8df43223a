//! 한글 유니코드 상수 및 자모 분류기
//!
//! - 첫가끝 자모(U+1100 ~ U+11FF) 초/중/종성 판별
//! - 초성 ↔ 종성 변환, 겹종성 분리
//! - 음절 합성/분해 (SBase 공식)
//! - 첫가끝 자모 → 호환 자모 변환 (미리보기 표시용)

// ── 한글 유니코드 상수 ──

/// 한글 음절 시작 '가' (U+AC00)
pub const S_BASE: u32 = 0xAC00;
/// 초성 시작 'ᄀ' (U+1100)
pub const L_BASE: u32 = 0x1100;
/// 중성 시작 'ᅡ' (U+1161)
pub const V_BASE: u32 = 0x1161;
/// 종성 기준 (U+11A7), 종성 없음 = 0
pub const T_BASE: u32 = 0x11A7;

pub const L_COUNT: u32 = 19;
pub const V_COUNT: u32 = 21;
pub const T_COUNT: u32 = 28;
pub const N_COUNT: u32 = V_COUNT * T_COUNT; // 588
pub const S_COUNT: u32 = L_COUNT * N_COUNT; // 11172

/// 초성 채움 문자 (HCF)
pub const CHOSEONG_FILLER: char = '\u{115F}';
/// 중성 채움 문자 (HJF)
pub const JUNGSEONG_FILLER: char = '\u{1160}';

// 옛한글을 포함한 자모 범위. 채움 문자는 어느 쪽에도 속하지 않는다.
const CHOSEONG_RANGE: std::ops::RangeInclusive<u32> = 0x1100..=0x1159;
const JUNGSEONG_RANGE: std::ops::RangeInclusive<u32> = 0x1161..=0x11A2;
const JONGSEONG_RANGE: std::ops::RangeInclusive<u32> = 0x11A8..=0x11F9;

// ── 자모 분류 ──

/// 초성인지 (U+1100~U+1159)
pub fn is_choseong(ch: char) -> bool {
    CHOSEONG_RANGE.contains(&(ch as u32))
}

/// 중성인지 (U+1161~U+11A2)
pub fn is_jungseong(ch: char) -> bool {
    JUNGSEONG_RANGE.contains(&(ch as u32))
}

/// 종성인지 (U+11A8~U+11F9)
pub fn is_jongseong(ch: char) -> bool {
    JONGSEONG_RANGE.contains(&(ch as u32))
}

pub fn is_jamo(ch: char) -> bool {
    is_choseong(ch) || is_jungseong(ch) || is_jongseong(ch)
}

/// 한글 완성형 음절인지 (가~힣)
pub fn is_syllable(ch: char) -> bool {
    let c = ch as u32;
    (S_BASE..S_BASE + S_COUNT).contains(&c)
}

// ── 초성 ↔ 종성 ──

/// (초성, 종성) 짝. ㄸ, ㅃ, ㅉ은 받침으로 쓰이지 않는다.
static CHOSEONG_JONGSEONG: &[(u32, u32)] = &[
    (0x1100, 0x11A8), // ㄱ
    (0x1101, 0x11A9), // ㄲ
    (0x1102, 0x11AB), // ㄴ
    (0x1103, 0x11AE), // ㄷ
    (0x1105, 0x11AF), // ㄹ
    (0x1106, 0x11B7), // ㅁ
    (0x1107, 0x11B8), // ㅂ
    (0x1109, 0x11BA), // ㅅ
    (0x110A, 0x11BB), // ㅆ
    (0x110B, 0x11BC), // ㅇ
    (0x110C, 0x11BD), // ㅈ
    (0x110E, 0x11BE), // ㅊ
    (0x110F, 0x11BF), // ㅋ
    (0x1110, 0x11C0), // ㅌ
    (0x1111, 0x11C1), // ㅍ
    (0x1112, 0x11C2), // ㅎ
    (0x1140, 0x11EB), // ㅿ
    (0x114C, 0x11F0), // ㆁ
    (0x1159, 0x11F9), // ㆆ
];

/// 초성에 대응하는 종성. 받침이 될 수 없으면 `None`.
pub fn choseong_to_jongseong(ch: char) -> Option<char> {
    let code = ch as u32;
    CHOSEONG_JONGSEONG
        .iter()
        .find(|(cho, _)| *cho == code)
        .and_then(|&(_, jong)| char::from_u32(jong))
}

/// 종성에 대응하는 초성. 겹받침처럼 짝이 없으면 `None`.
pub fn jongseong_to_choseong(ch: char) -> Option<char> {
    let code = ch as u32;
    CHOSEONG_JONGSEONG
        .iter()
        .find(|(_, jong)| *jong == code)
        .and_then(|&(cho, _)| char::from_u32(cho))
}

// ── 겹종성 분리 ──

/// 겹종성 → (남는 종성, 다음 음절 초성)
static JONGSEONG_DECOMPOSITION: &[(u32, (u32, u32))] = &[
    (0x11A9, (0x11A8, 0x1100)), // ㄲ → ㄱ + ㄱ
    (0x11AA, (0x11A8, 0x1109)), // ㄳ → ㄱ + ㅅ
    (0x11AC, (0x11AB, 0x110C)), // ㄵ → ㄴ + ㅈ
    (0x11AD, (0x11AB, 0x1112)), // ㄶ → ㄴ + ㅎ
    (0x11B0, (0x11AF, 0x1100)), // ㄺ → ㄹ + ㄱ
    (0x11B1, (0x11AF, 0x1106)), // ㄻ → ㄹ + ㅁ
    (0x11B2, (0x11AF, 0x1107)), // ㄼ → ㄹ + ㅂ
    (0x11B3, (0x11AF, 0x1109)), // ㄽ → ㄹ + ㅅ
    (0x11B4, (0x11AF, 0x1110)), // ㄾ → ㄹ + ㅌ
    (0x11B5, (0x11AF, 0x1111)), // ㄿ → ㄹ + ㅍ
    (0x11B6, (0x11AF, 0x1112)), // ㅀ → ㄹ + ㅎ
    (0x11B9, (0x11B8, 0x1109)), // ㅄ → ㅂ + ㅅ
    (0x11BB, (0x11BA, 0x1109)), // ㅆ → ㅅ + ㅅ
];

/// 겹종성을 (남는 종성, 다음 음절로 넘어갈 초성)으로 분리한다.
pub fn decompose_jongseong(ch: char) -> Option<(char, char)> {
    let code = ch as u32;
    JONGSEONG_DECOMPOSITION
        .iter()
        .find(|(jong, _)| *jong == code)
        .and_then(|&(_, (keep, next))| Some((char::from_u32(keep)?, char::from_u32(next)?)))
}

// ── 음절 합성/분해 ──

/// 초성, 중성, 종성으로 한글 음절을 합성한다.
/// 현대 한글 범위를 벗어난 자모가 있으면 `None`.
pub fn compose_syllable(cho: char, jung: char, jong: Option<char>) -> Option<char> {
    let l = (cho as u32).checked_sub(L_BASE).filter(|&l| l < L_COUNT)?;
    let v = (jung as u32).checked_sub(V_BASE).filter(|&v| v < V_COUNT)?;
    let t = match jong {
        Some(jong) => (jong as u32)
            .checked_sub(T_BASE)
            .filter(|&t| (1..T_COUNT).contains(&t))?,
        None => 0,
    };
    char::from_u32(S_BASE + (l * V_COUNT + v) * T_COUNT + t)
}

/// 한글 음절을 (초성, 중성, 종성)으로 분해한다.
pub fn decompose_syllable(ch: char) -> Option<(char, char, Option<char>)> {
    if !is_syllable(ch) {
        return None;
    }
    let offset = ch as u32 - S_BASE;
    let cho = char::from_u32(L_BASE + offset / N_COUNT)?;
    let jung = char::from_u32(V_BASE + (offset % N_COUNT) / T_COUNT)?;
    let t = offset % T_COUNT;
    let jong = if t == 0 {
        None
    } else {
        Some(char::from_u32(T_BASE + t)?)
    };
    Some((cho, jung, jong))
}

// ── 첫가끝 자모 → 호환 자모 ──

/// 현대 초성 인덱스 → 호환 자모
static CHOSEONG_TO_COMPAT: [u32; 19] = [
    0x3131, // ㄱ
    0x3132, // ㄲ
    0x3134, // ㄴ
    0x3137, // ㄷ
    0x3138, // ㄸ
    0x3139, // ㄹ
    0x3141, // ㅁ
    0x3142, // ㅂ
    0x3143, // ㅃ
    0x3145, // ㅅ
    0x3146, // ㅆ
    0x3147, // ㅇ
    0x3148, // ㅈ
    0x3149, // ㅉ
    0x314A, // ㅊ
    0x314B, // ㅋ
    0x314C, // ㅌ
    0x314D, // ㅍ
    0x314E, // ㅎ
];

/// 현대 종성 인덱스(1~27) → 호환 자모
static JONGSEONG_TO_COMPAT: [u32; 27] = [
    0x3131, // ㄱ
    0x3132, // ㄲ
    0x3133, // ㄳ
    0x3134, // ㄴ
    0x3135, // ㄵ
    0x3136, // ㄶ
    0x3137, // ㄷ
    0x3139, // ㄹ
    0x313A, // ㄺ
    0x313B, // ㄻ
    0x313C, // ㄼ
    0x313D, // ㄽ
    0x313E, // ㄾ
    0x313F, // ㄿ
    0x3140, // ㅀ
    0x3141, // ㅁ
    0x3142, // ㅂ
    0x3144, // ㅄ
    0x3145, // ㅅ
    0x3146, // ㅆ
    0x3147, // ㅇ
    0x3148, // ㅈ
    0x314A, // ㅊ
    0x314B, // ㅋ
    0x314C, // ㅌ
    0x314D, // ㅍ
    0x314E, // ㅎ
];

/// 호환 자모가 있는 옛한글
static ARCHAIC_TO_COMPAT: &[(u32, u32)] = &[
    (0x1114, 0x3165), // ㅥ
    (0x111D, 0x3171), // ㅱ
    (0x112B, 0x3178), // ㅸ
    (0x1140, 0x317F), // ㅿ
    (0x114C, 0x3181), // ㆁ
    (0x1157, 0x3184), // ㆄ
    (0x1159, 0x3186), // ㆆ
    (0x1184, 0x3187), // ㆇ
    (0x1185, 0x3188), // ㆈ
    (0x1188, 0x3189), // ㆉ
    (0x1191, 0x318A), // ㆊ
    (0x1192, 0x318B), // ㆋ
    (0x1194, 0x318C), // ㆌ
    (0x119E, 0x318D), // ㆍ
    (0x11A1, 0x318E), // ㆎ
    (0x11EB, 0x317F), // ㅿ (종성)
    (0x11F0, 0x3181), // ㆁ (종성)
    (0x11F9, 0x3186), // ㆆ (종성)
];

fn archaic_to_compat(ch: char) -> Option<char> {
    let code = ch as u32;
    ARCHAIC_TO_COMPAT
        .iter()
        .find(|(jamo, _)| *jamo == code)
        .and_then(|&(_, compat)| char::from_u32(compat))
}

pub fn choseong_to_compat(ch: char) -> Option<char> {
    match (ch as u32).checked_sub(L_BASE) {
        Some(l) if l < L_COUNT => char::from_u32(CHOSEONG_TO_COMPAT[l as usize]),
        _ => archaic_to_compat(ch).filter(|_| is_choseong(ch)),
    }
}

pub fn jungseong_to_compat(ch: char) -> Option<char> {
    match (ch as u32).checked_sub(V_BASE) {
        // 중성은 호환 자모에서도 같은 순서로 놓여 있다
        Some(v) if v < V_COUNT => char::from_u32(0x314F + v),
        _ => archaic_to_compat(ch).filter(|_| is_jungseong(ch)),
    }
}

pub fn jongseong_to_compat(ch: char) -> Option<char> {
    match (ch as u32).checked_sub(T_BASE + 1) {
        Some(t) if t < T_COUNT - 1 => char::from_u32(JONGSEONG_TO_COMPAT[t as usize]),
        _ => archaic_to_compat(ch).filter(|_| is_jongseong(ch)),
    }
}

/// 자모 하나를 표시용 호환 자모로 바꾼다. 대응이 없으면 그대로 둔다.
pub fn jamo_to_compat(ch: char) -> char {
    let compat = if is_choseong(ch) {
        choseong_to_compat(ch)
    } else if is_jungseong(ch) {
        jungseong_to_compat(ch)
    } else if is_jongseong(ch) {
        jongseong_to_compat(ch)
    } else {
        None
    };
    compat.unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_syllable() {
        // 가 = ㄱ + ㅏ
        assert_eq!(compose_syllable('\u{1100}', '\u{1161}', None), Some('가'));
        // 힣 = ㅎ + ㅣ + ㅎ
        assert_eq!(
            compose_syllable('\u{1112}', '\u{1175}', Some('\u{11C2}')),
            Some('힣')
        );
        // 한 = ㅎ + ㅏ + ㄴ
        assert_eq!(
            compose_syllable('\u{1112}', '\u{1161}', Some('\u{11AB}')),
            Some('한')
        );
        // 옛한글은 완성형이 없다
        assert_eq!(compose_syllable('\u{1140}', '\u{1161}', None), None);
        assert_eq!(compose_syllable('\u{1100}', '\u{119E}', None), None);
        assert_eq!(compose_syllable('\u{1100}', '\u{1161}', Some('\u{11EB}')), None);
    }

    #[test]
    fn test_decompose_syllable() {
        assert_eq!(
            decompose_syllable('글'),
            Some(('\u{1100}', '\u{1173}', Some('\u{11AF}')))
        );
        assert_eq!(decompose_syllable('가'), Some(('\u{1100}', '\u{1161}', None)));
        assert_eq!(decompose_syllable('A'), None);
    }

    #[test]
    fn test_classification_boundaries() {
        assert!(is_choseong('\u{1100}'));
        assert!(is_choseong('\u{1159}'));
        assert!(!is_choseong(CHOSEONG_FILLER));
        assert!(!is_jungseong(JUNGSEONG_FILLER));
        assert!(is_jungseong('\u{1161}'));
        assert!(is_jungseong('\u{11A2}'));
        assert!(!is_jongseong('\u{11A7}'));
        assert!(is_jongseong('\u{11A8}'));
        assert!(is_jongseong('\u{11F9}'));
        assert!(!is_jamo('ㄱ'));
    }

    #[test]
    fn test_jongseong_choseong_conversion() {
        // ㄱ ↔ ㄱ
        assert_eq!(choseong_to_jongseong('\u{1100}'), Some('\u{11A8}'));
        assert_eq!(jongseong_to_choseong('\u{11A8}'), Some('\u{1100}'));
        // ㅆ ↔ ㅆ
        assert_eq!(choseong_to_jongseong('\u{110A}'), Some('\u{11BB}'));
        // ㄸ, ㅃ, ㅉ은 받침 불가
        assert_eq!(choseong_to_jongseong('\u{1104}'), None);
        assert_eq!(choseong_to_jongseong('\u{1108}'), None);
        assert_eq!(choseong_to_jongseong('\u{110D}'), None);
        // 겹받침은 초성이 없다
        assert_eq!(jongseong_to_choseong('\u{11AA}'), None);
    }

    #[test]
    fn test_decompose_jongseong() {
        // ㄳ → ㄱ + ㅅ
        assert_eq!(
            decompose_jongseong('\u{11AA}'),
            Some(('\u{11A8}', '\u{1109}'))
        );
        // ㅀ → ㄹ + ㅎ
        assert_eq!(
            decompose_jongseong('\u{11B6}'),
            Some(('\u{11AF}', '\u{1112}'))
        );
        // 홑받침
        assert_eq!(decompose_jongseong('\u{11AB}'), None);
    }

    #[test]
    fn test_decomposition_parts_are_consistent() {
        for &(jong, (keep, next)) in JONGSEONG_DECOMPOSITION {
            let keep = char::from_u32(keep).unwrap();
            let next = char::from_u32(next).unwrap();
            assert!(is_jongseong(char::from_u32(jong).unwrap()));
            assert!(is_jongseong(keep));
            assert!(is_choseong(next));
        }
    }

    #[test]
    fn test_to_compat() {
        assert_eq!(choseong_to_compat('\u{1100}'), Some('ㄱ'));
        assert_eq!(choseong_to_compat('\u{1112}'), Some('ㅎ'));
        assert_eq!(jungseong_to_compat('\u{1161}'), Some('ㅏ'));
        assert_eq!(jungseong_to_compat('\u{1175}'), Some('ㅣ'));
        assert_eq!(jongseong_to_compat('\u{11A8}'), Some('ㄱ'));
        assert_eq!(jongseong_to_compat('\u{11AA}'), Some('ㄳ'));
        assert_eq!(jongseong_to_compat('\u{11C2}'), Some('ㅎ'));
        // 옛한글
        assert_eq!(choseong_to_compat('\u{1140}'), Some('ㅿ'));
        assert_eq!(jungseong_to_compat('\u{119E}'), Some('ㆍ'));
        assert_eq!(jongseong_to_compat('\u{11F9}'), Some('ㆆ'));
        // 분류가 다르면 변환하지 않는다
        assert_eq!(choseong_to_compat('\u{11EB}'), None);
    }

    #[test]
    fn test_jamo_to_compat_falls_back() {
        assert_eq!(jamo_to_compat('\u{1100}'), 'ㄱ');
        // 호환 자모가 없는 옛한글은 그대로
        assert_eq!(jamo_to_compat('\u{1113}'), '\u{1113}');
        assert_eq!(jamo_to_compat('a'), 'a');
    }
}
