//! 두벌식(2-beolsik) 오토마타
//!
//! 자판은 초성과 중성만 낸다. 받침은 초성을 종성으로 바꿔 만들고, 모음이
//! 뒤따르면 마지막 받침을 다음 음절의 초성으로 옮긴다 (종성 분리).
//! 분리할 받침이 홑받침인지 겹받침인지는 되돌리기 스택으로 판단한다.

use crate::unicode;

use super::{Automata, Composer, KeyInput, Slot, Transition};

/// 두벌식 오토마타. 상태는 모두 조합 버퍼에 있다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JamoAutomata;

impl JamoAutomata {
    fn choseong(&self, c: &mut Composer<'_>, ch: char) -> Transition {
        let cho = c.slot(Slot::Choseong);
        let jung = c.slot(Slot::Jungseong);

        if let Some(jong) = c.slot(Slot::Jongseong) {
            // 받침 + 자음: 겹받침 시도
            if let Some(jong_ch) = unicode::choseong_to_jongseong(ch)
                && let Some(comp) = c.compose(jong, jong_ch).filter(|&j| unicode::is_jongseong(j))
                && c.check_charset(cho, jung, Some(comp))
            {
                c.fill(Slot::Jongseong, comp);
                return Transition::Update;
            }
            return c.restart(Slot::Choseong, ch);
        }

        if let Some(jung) = jung {
            if cho.is_none() {
                // 모음 뒤에 온 초성: 빈 초성 자리를 채운다
                c.fill(Slot::Choseong, ch);
                return Transition::Update;
            }
            // 초성 + 중성 + 자음: 받침으로
            if let Some(jong_ch) = unicode::choseong_to_jongseong(ch)
                && c.check_charset(cho, Some(jung), Some(jong_ch))
            {
                c.fill(Slot::Jongseong, jong_ch);
                return Transition::Update;
            }
            return c.restart(Slot::Choseong, ch);
        }

        if let Some(cho) = cho {
            // 초성 + 초성: 된소리 시도
            if let Some(comp) = c.compose(cho, ch).filter(|&l| unicode::is_choseong(l)) {
                c.fill(Slot::Choseong, comp);
                return Transition::Update;
            }
            return c.restart(Slot::Choseong, ch);
        }

        c.fill(Slot::Choseong, ch);
        Transition::Insert
    }

    fn jungseong(&self, c: &mut Composer<'_>, ch: char) -> Transition {
        let cho = c.slot(Slot::Choseong);

        if let Some(jong) = c.slot(Slot::Jongseong) {
            return self.split_jongseong(c, jong, ch);
        }

        if let Some(jung) = c.slot(Slot::Jungseong) {
            // 겹모음 시도
            if let Some(comp) = c.compose(jung, ch).filter(|&v| unicode::is_jungseong(v))
                && c.check_charset(cho, Some(comp), None)
            {
                c.fill(Slot::Jungseong, comp);
                return Transition::Update;
            }
            return c.restart(Slot::Jungseong, ch);
        }

        c.fill(Slot::Jungseong, ch);
        if cho.is_some() {
            Transition::Update
        } else {
            Transition::Insert
        }
    }

    /// ★종성 분리★
    ///
    /// 직전 단계가 종성이면 마지막 받침은 겹받침이므로 둘로 나눠 뒷부분만
    /// 옮기고, 직전 단계가 중성이면 받침 전체를 다음 초성으로 옮긴다.
    fn split_jongseong(&self, c: &mut Composer<'_>, jong: char, ch: char) -> Transition {
        c.pop();
        let split = match c.peek() {
            Some(prev) if unicode::is_jongseong(prev) => unicode::decompose_jongseong(jong),
            _ => None,
        };
        let (keep, next) = match split {
            Some((keep, next)) => (Some(keep), Some(next)),
            None => match unicode::jongseong_to_choseong(jong) {
                Some(next) => (None, Some(next)),
                // 초성으로 쓸 수 없는 받침은 앞 음절에 남긴다
                None => (Some(jong), None),
            },
        };

        c.set(Slot::Jongseong, keep);
        c.commit();
        if let Some(next) = next {
            c.fill(Slot::Choseong, next);
        }
        c.fill(Slot::Jungseong, ch);
        Transition::Insert
    }

    /// 세벌식 자판이나 유니코드 키심으로 들어온 종성
    fn jongseong(&self, c: &mut Composer<'_>, ch: char) -> Transition {
        let cho = c.slot(Slot::Choseong);
        let jung = c.slot(Slot::Jungseong);

        if let Some(jong) = c.slot(Slot::Jongseong) {
            if let Some(comp) = c.compose(jong, ch).filter(|&j| unicode::is_jongseong(j))
                && c.check_charset(cho, jung, Some(comp))
            {
                c.fill(Slot::Jongseong, comp);
                return Transition::Update;
            }
            return c.restart(Slot::Jongseong, ch);
        }

        if cho.is_some() && jung.is_some() && c.check_charset(cho, jung, Some(ch)) {
            c.fill(Slot::Jongseong, ch);
            return Transition::Update;
        }
        c.restart(Slot::Jongseong, ch)
    }
}

impl Automata for JamoAutomata {
    fn process(&self, c: &mut Composer<'_>, input: KeyInput) -> Transition {
        let Some((ch, slot)) = input.ch.and_then(|ch| Some((ch, Slot::of(ch)?))) else {
            // 숫자, 문장 부호 등: 조합을 확정하고 키는 넘긴다
            return c.flush_for(&input).unwrap_or(Transition::NotConsumed);
        };

        c.ensure_room();
        match slot {
            Slot::Choseong => self.choseong(c, ch),
            Slot::Jungseong => self.jungseong(c, ch),
            Slot::Jongseong => self.jongseong(c, ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::testing::Harness;
    use crate::charset::EncodingOracle;

    fn harness() -> Harness {
        Harness::new("2")
    }

    #[test]
    fn test_single_consonant() {
        let mut h = harness();
        assert_eq!(h.key('r'), Transition::Insert); // ㄱ
        assert_eq!(h.preedit(), "ㄱ");
        assert!(h.committed.is_empty());
    }

    #[test]
    fn test_consonant_vowel() {
        let mut h = harness();
        assert_eq!(h.key('r'), Transition::Insert);
        assert_eq!(h.key('k'), Transition::Update);
        assert_eq!(h.preedit(), "가");
    }

    #[test]
    fn test_full_syllable_han() {
        // ㅎ ㅏ ㄴ → 한
        let mut h = harness();
        let (committed, composing) = h.process_keys("gks");
        assert_eq!(committed, "");
        assert_eq!(composing, "한");
    }

    #[test]
    fn test_hangul_word() {
        // ㅎ ㅏ ㄴ ㄱ ㅡ ㄹ → "한" 확정 + "글" 조합
        let mut h = harness();
        let (committed, composing) = h.process_keys("gksrmf");
        assert_eq!(committed, "한");
        assert_eq!(composing, "글");
        assert_eq!(h.flush(), "한글");
    }

    #[test]
    fn test_jongseong_split() {
        // ㄱ ㅏ ㄴ ㅕ → "가" 확정 + "녀" 조합 (종성 분리)
        let mut h = harness();
        let (committed, composing) = h.process_keys("rks");
        assert_eq!((committed.as_str(), composing.as_str()), ("", "간"));
        assert_eq!(h.key('u'), Transition::Insert);
        assert_eq!(h.committed, ["가"]);
        assert_eq!(h.preedit(), "녀");
    }

    #[test]
    fn test_double_jongseong_split() {
        // ㄱ ㅏ ㅂ ㅅ ㅣ → "갑" 확정 + "시" 조합 (겹종성 분리)
        let mut h = harness();
        let (committed, composing) = h.process_keys("rkqt");
        assert_eq!(committed, "");
        assert_eq!(composing, "값");
        let (committed, composing) = h.process_keys("l");
        assert_eq!(committed, "갑");
        assert_eq!(composing, "시");
    }

    #[test]
    fn test_ssang_jongseong_moves_whole() {
        // ㄱ ㅏ ㄲ(Shift+r) ㅏ → "가" + "까": 한 번에 들어온 ㄲ은 통째로 넘어간다
        let mut h = harness();
        let (committed, composing) = h.process_keys("rkRk");
        assert_eq!(committed, "가");
        assert_eq!(composing, "까");
    }

    #[test]
    fn test_composed_ssang_jongseong_splits() {
        // ㄱ ㅏ ㄱ ㄱ ㅏ → "각" + "가": 조합으로 만든 ㄲ은 나뉜다
        let mut h = harness();
        let (committed, composing) = h.process_keys("rkrr");
        assert_eq!((committed.as_str(), composing.as_str()), ("", "갂"));
        let (committed, composing) = h.process_keys("k");
        assert_eq!(committed, "각");
        assert_eq!(composing, "가");
    }

    #[test]
    fn test_double_vowel() {
        // ㄱ ㅗ ㅏ → "과" (겹모음 ㅘ)
        let mut h = harness();
        let (committed, composing) = h.process_keys("rhk");
        assert_eq!(committed, "");
        assert_eq!(composing, "과");
    }

    #[test]
    fn test_double_vowel_with_jongseong() {
        // ㄱ ㅗ ㅏ ㄴ → "관"
        let mut h = harness();
        let (committed, composing) = h.process_keys("rhks");
        assert_eq!(committed, "");
        assert_eq!(composing, "관");
    }

    #[test]
    fn test_ssang_choseong() {
        // ㄱ ㄱ ㅏ → "까"
        let mut h = harness();
        assert_eq!(h.process_keys("rrk"), (String::new(), "까".to_string()));
    }

    #[test]
    fn test_backspace_from_jongseong() {
        // ㅎ ㅏ ㄴ + backspace → "하"
        let mut h = harness();
        h.process_keys("gks");
        assert_eq!(h.backspace(), Transition::Update);
        assert_eq!(h.preedit(), "하");
    }

    #[test]
    fn test_backspace_to_empty() {
        let mut h = harness();
        h.process_keys("gk");
        assert_eq!(h.backspace(), Transition::Update);
        assert_eq!(h.preedit(), "ㅎ");
        assert_eq!(h.backspace(), Transition::Update);
        assert_eq!(h.preedit(), "");
        assert!(h.buffer.is_empty());
        // 조합 없음 → 시스템에 위임
        assert_eq!(h.backspace(), Transition::NotConsumed);
    }

    #[test]
    fn test_backspace_from_double_jongseong() {
        // ㄱ ㅏ ㄱ ㅅ + backspace → "각" (ㄳ에서 ㅅ 제거)
        let mut h = harness();
        h.process_keys("rkrt");
        assert_eq!(h.preedit(), "갃");
        assert_eq!(h.backspace(), Transition::Update);
        assert_eq!(h.preedit(), "각");
        assert_eq!(h.buffer.jongseong, Some('\u{11A8}'));
    }

    #[test]
    fn test_backspace_through_double_vowel_with_jongseong() {
        // ㄱ ㅗ ㅏ ㄴ (관) + BS + BS → "과" → "고" (겹모음 복원)
        let mut h = harness();
        h.process_keys("rhks");
        h.backspace();
        assert_eq!(h.preedit(), "과");
        h.backspace();
        assert_eq!(h.preedit(), "고");
    }

    #[test]
    fn test_backspace_after_split_restores_new_syllable_only() {
        // 가 + 녀 상태에서 BS → "ㄴ", 이미 확정된 "가"는 건드리지 않는다
        let mut h = harness();
        h.process_keys("rksu");
        h.backspace();
        assert_eq!(h.preedit(), "ㄴ");
        assert_eq!(h.committed, ["가"]);
    }

    #[test]
    fn test_jongseong_impossible_ddikkut() {
        // ㄱ ㅏ + ㄸ → "가" 확정 + "ㄸ" 조합 (ㄸ는 종성 불가)
        let mut h = harness();
        let (committed, composing) = h.process_keys("rkE");
        assert_eq!(committed, "가");
        assert_eq!(composing, "ㄸ");
    }

    #[test]
    fn test_vowel_only() {
        let mut h = harness();
        assert_eq!(h.key('k'), Transition::Insert);
        assert_eq!(h.preedit(), "ㅏ");
    }

    #[test]
    fn test_vowel_then_consonant_fills_choseong() {
        // ㅏ + ㄱ → 비어 있는 초성 자리를 채워 "가"
        let mut h = harness();
        h.key('k');
        assert_eq!(h.key('r'), Transition::Update);
        assert_eq!(h.preedit(), "가");
        assert!(h.committed.is_empty());
    }

    #[test]
    fn test_consecutive_consonants() {
        // ㄱ + ㄴ → "ㄱ" 확정 + "ㄴ" 조합
        let mut h = harness();
        h.key('r');
        assert_eq!(h.key('s'), Transition::Insert);
        assert_eq!(h.committed, ["ㄱ"]);
        assert_eq!(h.preedit(), "ㄴ");
    }

    #[test]
    fn test_non_jamo_key_commits_and_forwards() {
        let mut h = harness();
        h.process_keys("gks");
        assert_eq!(h.key('1'), Transition::NotConsumed);
        assert_eq!(h.committed, ["한"]);
        assert!(h.buffer.is_empty());
        // 빈 상태에서는 아무것도 확정하지 않는다
        assert_eq!(h.key('.'), Transition::NotConsumed);
        assert_eq!(h.committed, ["한"]);
    }

    #[test]
    fn test_jongseong_input_from_unicode_keysym() {
        let mut h = harness();
        h.process_keys("rk");
        assert_eq!(h.input(KeyInput::jamo('\u{11AF}')), Transition::Update); // ㄹ 받침
        assert_eq!(h.input(KeyInput::jamo('\u{11A8}')), Transition::Update); // ㄺ
        assert_eq!(h.preedit(), "갉");
        // 받침 자리가 없는 상태의 종성은 새 음절
        assert_eq!(h.input(KeyInput::jamo('\u{11A8}')), Transition::Insert);
        assert_eq!(h.committed, ["갉"]);
        assert_eq!(h.preedit(), "ㄱ");
    }

    #[test]
    fn test_charset_rejects_extended_syllable() {
        // 똠: ㄸ ㅗ ㅁ 은 완성형에 없으므로 ㅁ이 새 음절로
        let mut h = harness().with_oracle(EncodingOracle::new("euc-kr").unwrap());
        let (committed, composing) = h.process_keys("Eha");
        assert_eq!(committed, "또");
        assert_eq!(composing, "ㅁ");
    }

    #[test]
    fn test_charset_rejects_compound_jongseong() {
        let mut h = harness().with_oracle(|ch: char| ch != '값');
        let (committed, composing) = h.process_keys("rkqt");
        assert_eq!(committed, "갑");
        assert_eq!(composing, "ㅅ");
    }

    #[test]
    fn test_flush() {
        let mut h = harness();
        h.process_keys("gks");
        assert_eq!(h.flush(), "한");
        assert!(h.buffer.is_empty());
        assert_eq!(h.buffer.depth(), 0);
    }
}
