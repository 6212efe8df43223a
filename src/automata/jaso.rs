//! 세벌식(3-beolsik) 오토마타
//!
//! 초성, 중성, 종성이 키에서 바로 나오므로 종성 분리가 없다.
//! 문자셋 검사가 켜져 있으면 초성 → 중성 → 종성 순서를 지키는 규칙을,
//! 꺼져 있으면 자리만 비어 있으면 채우는 자유 순서 규칙을 쓴다.

use crate::{keysym, unicode};

use super::{Automata, Composer, KeyInput, Slot, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JasoAutomata;

impl JasoAutomata {
    /// 순서 규칙: 자리가 앞으로만 채워진다.
    fn ordered(&self, c: &mut Composer<'_>, slot: Slot, ch: char) -> Transition {
        let cho = c.slot(Slot::Choseong);
        let jung = c.slot(Slot::Jungseong);
        let jong = c.slot(Slot::Jongseong);

        match (slot, cho, jung, jong) {
            // 받침이 있으면 겹받침만 이어 붙인다
            (Slot::Jongseong, _, _, Some(jong)) => {
                if let Some(comp) = c.compose(jong, ch).filter(|&j| unicode::is_jongseong(j))
                    && c.check_charset(cho, jung, Some(comp))
                {
                    c.fill(Slot::Jongseong, comp);
                    return Transition::Update;
                }
                c.restart(Slot::Jongseong, ch)
            }
            (_, _, _, Some(_)) => c.restart(slot, ch),

            (Slot::Jungseong, _, Some(jung), None) => {
                if let Some(comp) = c.compose(jung, ch).filter(|&v| unicode::is_jungseong(v))
                    && c.check_charset(cho, Some(comp), None)
                {
                    c.fill(Slot::Jungseong, comp);
                    return Transition::Update;
                }
                c.restart(Slot::Jungseong, ch)
            }
            (Slot::Jongseong, Some(_), Some(_), None) => {
                if c.check_charset(cho, jung, Some(ch)) {
                    c.fill(Slot::Jongseong, ch);
                    return Transition::Update;
                }
                c.restart(Slot::Jongseong, ch)
            }
            // 모음만 있을 때 온 초성은 앞자리를 채운다
            (Slot::Choseong, None, Some(_), None) => {
                c.fill(Slot::Choseong, ch);
                Transition::Update
            }
            (_, _, Some(_), None) => c.restart(slot, ch),

            (Slot::Choseong, Some(cho), None, None) => {
                if let Some(comp) = c.compose(cho, ch).filter(|&l| unicode::is_choseong(l)) {
                    c.fill(Slot::Choseong, comp);
                    return Transition::Update;
                }
                c.restart(Slot::Choseong, ch)
            }
            (Slot::Jungseong, Some(_), None, None) => {
                c.fill(Slot::Jungseong, ch);
                Transition::Update
            }
            (Slot::Jongseong, Some(_), None, None) => c.restart(Slot::Jongseong, ch),

            (_, None, None, None) => {
                c.fill(slot, ch);
                Transition::Insert
            }
        }
    }

    /// 자유 순서 규칙: 빈 자리는 순서와 상관없이 채우고, 같은 자리의 자모가
    /// 바로 앞에 들어왔을 때만 조합한다.
    fn free(&self, c: &mut Composer<'_>, slot: Slot, ch: char) -> Transition {
        if c.slot(slot).is_none() {
            let fresh = c.buffer().depth() == 0;
            c.fill(slot, ch);
            return if fresh {
                Transition::Insert
            } else {
                Transition::Update
            };
        }

        if let Some(prev) = c.peek().filter(|&p| slot.contains(p))
            && let Some(comp) = c.compose(prev, ch).filter(|&r| slot.contains(r))
        {
            c.fill(slot, comp);
            return Transition::Update;
        }
        c.restart(slot, ch)
    }
}

impl Automata for JasoAutomata {
    fn process(&self, c: &mut Composer<'_>, input: KeyInput) -> Transition {
        let Some((ch, slot)) = input.ch.and_then(|ch| Some((ch, Slot::of(ch)?))) else {
            if let Some(transition) = c.flush_for(&input) {
                return transition;
            }
            // 숫자와 기호는 자판이 정한 문자로, 자판에 없는 스페이스와 Latin-1은
            // 키심 그대로 확정
            return match input.ch.or_else(|| keysym::keysym_to_char(input.keysym)) {
                Some(ch) => {
                    c.commit_char(ch);
                    Transition::Commit
                }
                None => Transition::NotConsumed,
            };
        };

        c.ensure_room();
        if c.charset_check_enabled() {
            self.ordered(c, slot, ch)
        } else {
            self.free(c, slot, ch)
        }
    }
}
