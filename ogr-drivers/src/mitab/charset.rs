//! Jeux de caractères MapInfo

use encoding_rs::Encoding;

/// Mappe un nom de charset MapInfo (en-tête `!charset`) vers un encodage
///
/// `Neutral` et les charsets sans équivalent `encoding_rs` renvoient `None`.
pub fn charset_to_encoding(charset: &str) -> Option<&'static Encoding> {
    let encoding = match charset.to_ascii_uppercase().as_str() {
        "WINDOWSLATIN1" | "ISO8859_1" => encoding_rs::WINDOWS_1252,
        "WINDOWSLATIN2" => encoding_rs::WINDOWS_1250,
        "WINDOWSARABIC" => encoding_rs::WINDOWS_1256,
        "WINDOWSCYRILLIC" => encoding_rs::WINDOWS_1251,
        "WINDOWSGREEK" => encoding_rs::WINDOWS_1253,
        "WINDOWSHEBREW" => encoding_rs::WINDOWS_1255,
        "WINDOWSTURKISH" | "ISO8859_9" => encoding_rs::WINDOWS_1254,
        "WINDOWSBALTICRIM" => encoding_rs::WINDOWS_1257,
        "WINDOWSVIETNAMESE" => encoding_rs::WINDOWS_1258,
        "WINDOWSTRADCHINESE" => encoding_rs::BIG5,
        "WINDOWSSIMPCHINESE" => encoding_rs::GBK,
        "WINDOWSJAPANESE" => encoding_rs::SHIFT_JIS,
        "WINDOWSKOREAN" => encoding_rs::EUC_KR,
        "ISO8859_2" => encoding_rs::ISO_8859_2,
        "ISO8859_3" => encoding_rs::ISO_8859_3,
        "ISO8859_4" => encoding_rs::ISO_8859_4,
        "ISO8859_5" => encoding_rs::ISO_8859_5,
        "ISO8859_6" => encoding_rs::ISO_8859_6,
        "ISO8859_7" => encoding_rs::ISO_8859_7,
        "ISO8859_8" => encoding_rs::ISO_8859_8,
        "CODEPAGE866" => encoding_rs::IBM866,
        "UTF-8" | "UTF8" => encoding_rs::UTF_8,
        _ => return None,
    };
    Some(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_latin1() {
        assert_eq!(charset_to_encoding("WindowsLatin1").unwrap().name(), "windows-1252");
    }

    #[test]
    fn test_iso_8859_2() {
        assert_eq!(charset_to_encoding("ISO8859_2").unwrap().name(), "ISO-8859-2");
    }

    #[test]
    fn test_neutral_has_no_encoding() {
        assert!(charset_to_encoding("Neutral").is_none());
        assert!(charset_to_encoding("CodePage437").is_none());
    }
}
