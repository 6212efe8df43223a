//! 문자셋 검사
//!
//! 클라이언트가 EUC-KR 같은 옛 문자셋만 받을 수 있을 때, 조합 결과가 그
//! 문자셋으로 표현되지 않으면 조합하지 않고 앞 음절을 확정한다.

use std::fmt;

use encoding::all::WINDOWS_949;
use encoding::label::encoding_from_whatwg_label;
use encoding::{EncoderTrap, Encoding, EncodingRef};
use log::debug;

use crate::error::{Error, Result};
use crate::unicode;

/// 후보 문자가 대상 문자셋으로 표현 가능한지 답한다.
pub trait CharsetOracle: Send + Sync {
    fn is_representable(&self, ch: char) -> bool;
}

impl<F> CharsetOracle for F
where
    F: Fn(char) -> bool + Send + Sync,
{
    fn is_representable(&self, ch: char) -> bool {
        self(ch)
    }
}

/// 모든 문자를 허용한다. 문자셋 검사를 끈 것과 같다.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CharsetOracle for AcceptAll {
    fn is_representable(&self, _ch: char) -> bool {
        true
    }
}

/// `encoding` 크레이트의 인코더로 판별하는 오라클
#[derive(Clone)]
pub struct EncodingOracle {
    label: String,
    encoding: EncodingRef,
    /// KS X 1001 완성형만 허용 (두 바이트 모두 0xA1 이상)
    wansung_only: bool,
}

impl fmt::Debug for EncodingOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingOracle")
            .field("label", &self.label)
            .field("encoding", &self.encoding.name())
            .field("wansung_only", &self.wansung_only)
            .finish()
    }
}

impl EncodingOracle {
    /// 문자셋 이름으로 오라클을 만든다.
    ///
    /// `euc-kr`, `ksc5601` 계열은 완성형 2350자만, `cp949`, `uhc` 계열은
    /// 확장 완성형 전체를 허용한다. 그 밖의 이름은 WHATWG 레이블로 찾는다.
    pub fn new(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let (encoding, wansung_only) = match normalized.as_str() {
            "euc-kr" | "euckr" | "euc_kr" | "ksc5601" | "ks_c_5601-1987" | "ksx1001" => {
                (WINDOWS_949 as EncodingRef, true)
            }
            "cp949" | "uhc" | "windows-949" => (WINDOWS_949 as EncodingRef, false),
            other => (
                encoding_from_whatwg_label(other)
                    .ok_or_else(|| Error::UnknownCharset(label.to_string()))?,
                false,
            ),
        };
        debug!(
            "charset oracle {label:?} → {} (wansung only: {wansung_only})",
            encoding.name()
        );
        Ok(EncodingOracle {
            label: label.to_string(),
            encoding,
            wansung_only,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl CharsetOracle for EncodingOracle {
    fn is_representable(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        let Ok(bytes) = self.encoding.encode(ch.encode_utf8(&mut buf), EncoderTrap::Strict) else {
            return false;
        };
        if !self.wansung_only || ch.is_ascii() {
            return true;
        }
        matches!(bytes.as_slice(), [lead, trail] if *lead >= 0xA1 && *trail >= 0xA1)
    }
}

/// 조합 후보 (초성, 중성, 종성)가 문자셋 검사를 통과하는지 본다.
///
/// 초성과 중성이 모두 있으면 완성형 음절(U+AC00~U+D7A3)이 되어야 하고 그
/// 음절이 표현 가능해야 한다. 음절이 되지 않는 부분 조합은 각 자모의 호환
/// 자모 형태로 판단한다.
pub fn check_syllable(
    oracle: &dyn CharsetOracle,
    cho: Option<char>,
    jung: Option<char>,
    jong: Option<char>,
) -> bool {
    if let (Some(cho), Some(jung)) = (cho, jung) {
        return match unicode::compose_syllable(cho, jung, jong) {
            Some(syllable) => oracle.is_representable(syllable),
            None => false,
        };
    }

    let present = [
        cho.map(unicode::choseong_to_compat),
        jung.map(unicode::jungseong_to_compat),
        jong.map(unicode::jongseong_to_compat),
    ];
    present.into_iter().flatten().all(|compat| match compat {
        Some(ch) => oracle.is_representable(ch),
        None => false,
    })
}
