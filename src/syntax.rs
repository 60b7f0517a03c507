//! Language profiles and the per-row highlight scanner.
//!
//! Highlighting is lexical, not a parse: a single left-to-right pass over a
//! row's rendered text, carrying string/comment state, classifies every cell.
//! The only cross-row state is "ends inside a multi-line comment", which the
//! document propagates forward (see `Document::rescan_from`).

use crossterm::style::Color;

/// Distinguishes the two keyword color classes in a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeywordClass {
    /// Control flow and declarations.
    Flow,
    /// Type names.
    Type,
}

/// The semantic class of one rendered cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    MultilineComment,
    Keyword(KeywordClass),
    String,
    Number,
    /// Temporary overlay on the current search match.
    Match,
}

impl Highlight {
    /// Foreground color for this class; `None` means the terminal default.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Normal => None,
            Self::Comment | Self::MultilineComment => Some(Color::DarkCyan),
            Self::Keyword(KeywordClass::Flow) => Some(Color::DarkYellow),
            Self::Keyword(KeywordClass::Type) => Some(Color::DarkGreen),
            Self::String => Some(Color::DarkMagenta),
            Self::Number => Some(Color::DarkRed),
            Self::Match => Some(Color::DarkBlue),
        }
    }
}

/// A keyword with its color class.
pub struct Keyword {
    pub word: &'static str,
    pub class: KeywordClass,
}

const fn flow(word: &'static str) -> Keyword {
    Keyword { word, class: KeywordClass::Flow }
}

const fn ty(word: &'static str) -> Keyword {
    Keyword { word, class: KeywordClass::Type }
}

/// A static description of how to highlight one file type.
pub struct Syntax {
    pub name: &'static str,
    /// Dot-prefixed entries match the filename extension (suffix match);
    /// anything else matches as a substring of the filename.
    pub filematch: &'static [&'static str],
    pub keywords: &'static [Keyword],
    pub singleline_comment: Option<&'static str>,
    pub multiline_comment: Option<(&'static str, &'static str)>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

/// The built-in language registry. Selection is by filename only, never by
/// content.
pub static SYNTAXES: &[Syntax] = &[
    Syntax {
        name: "c",
        filematch: &[".c", ".h", ".cpp"],
        keywords: &[
            flow("switch"), flow("if"), flow("while"), flow("for"),
            flow("break"), flow("continue"), flow("return"), flow("else"),
            flow("struct"), flow("union"), flow("typedef"), flow("static"),
            flow("enum"), flow("class"), flow("case"),
            ty("int"), ty("long"), ty("double"), ty("float"), ty("char"),
            ty("unsigned"), ty("signed"), ty("void"),
        ],
        singleline_comment: Some("//"),
        multiline_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    Syntax {
        name: "rust",
        filematch: &[".rs"],
        keywords: &[
            flow("fn"), flow("let"), flow("mut"), flow("pub"), flow("use"),
            flow("mod"), flow("impl"), flow("trait"), flow("struct"),
            flow("enum"), flow("match"), flow("if"), flow("else"),
            flow("while"), flow("for"), flow("loop"), flow("return"),
            flow("break"), flow("continue"), flow("const"), flow("static"),
            flow("move"), flow("unsafe"), flow("where"), flow("as"),
            flow("in"), flow("ref"), flow("dyn"),
            ty("i8"), ty("i16"), ty("i32"), ty("i64"), ty("i128"),
            ty("u8"), ty("u16"), ty("u32"), ty("u64"), ty("u128"),
            ty("usize"), ty("isize"), ty("f32"), ty("f64"), ty("bool"),
            ty("char"), ty("str"), ty("String"), ty("Vec"), ty("Option"),
            ty("Result"), ty("Self"),
        ],
        singleline_comment: Some("//"),
        multiline_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
];

/// Find the profile whose filematch list covers `filename`.
pub fn syntax_for_filename(filename: &str) -> Option<&'static Syntax> {
    SYNTAXES.iter().find(|syntax| {
        syntax.filematch.iter().any(|pat| {
            if let Some(ext) = pat.strip_prefix('.') {
                std::path::Path::new(filename)
                    .extension()
                    .is_some_and(|e| e == ext)
            } else {
                filename.contains(pat)
            }
        })
    })
}

/// Word boundary set for keyword and number detection.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || ",.()+-/*=~%<>[];".contains(c)
}

fn matches_at(chars: &[char], at: usize, pat: &str) -> bool {
    pat.chars()
        .enumerate()
        .all(|(k, pc)| chars.get(at + k) == Some(&pc))
}

/// Classify every rendered cell of one row.
///
/// `starts_in_comment` is the previous row's terminal comment state. Returns
/// the classification array (one entry per rendered char) and whether the
/// row itself ends inside an unterminated multi-line comment.
pub fn scan_row(
    syntax: &Syntax,
    render: &str,
    starts_in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let chars: Vec<char> = render.chars().collect();
    let mut hl = vec![Highlight::Normal; chars.len()];

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = starts_in_comment;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Single-line comment: rest of the row, unless inside a string or an
        // open multi-line comment.
        if let Some(scs) = syntax.singleline_comment {
            if in_string.is_none() && !in_comment && matches_at(&chars, i, scs) {
                for cell in &mut hl[i..] {
                    *cell = Highlight::Comment;
                }
                break;
            }
        }

        // Multi-line comment state: inside one we only look for the end
        // marker; outside we look for the start marker.
        if let Some((mcs, mce)) = syntax.multiline_comment {
            if in_string.is_none() {
                if in_comment {
                    if matches_at(&chars, i, mce) {
                        for cell in &mut hl[i..i + mce.len()] {
                            *cell = Highlight::MultilineComment;
                        }
                        i += mce.len();
                        in_comment = false;
                        prev_sep = true;
                    } else {
                        hl[i] = Highlight::MultilineComment;
                        i += 1;
                    }
                    continue;
                } else if matches_at(&chars, i, mcs) {
                    for cell in &mut hl[i..i + mcs.len()] {
                        *cell = Highlight::MultilineComment;
                    }
                    i += mcs.len();
                    in_comment = true;
                    continue;
                }
            }
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                // A backslash escapes the next char, including the quote.
                if c == '\\' && i + 1 < chars.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers {
            let continues_number = prev_hl == Highlight::Number;
            if (c.is_ascii_digit() && (prev_sep || continues_number))
                || (c == '.' && continues_number)
            {
                hl[i] = Highlight::Number;
                i += 1;
                prev_sep = false;
                continue;
            }
        }

        // Keywords only start right after a separator and must end at one
        // (whole-word match).
        if prev_sep {
            let hit = syntax.keywords.iter().find(|kw| {
                let len = kw.word.chars().count();
                matches_at(&chars, i, kw.word)
                    && chars.get(i + len).is_none_or(|&next| is_separator(next))
            });
            if let Some(kw) = hit {
                let len = kw.word.chars().count();
                for cell in &mut hl[i..i + len] {
                    *cell = Highlight::Keyword(kw.class);
                }
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_syntax() -> &'static Syntax {
        SYNTAXES.iter().find(|s| s.name == "c").unwrap()
    }

    fn classes(render: &str) -> Vec<Highlight> {
        scan_row(c_syntax(), render, false).0
    }

    // ==================== profile selection tests ====================

    #[test]
    fn selects_by_extension() {
        assert_eq!(syntax_for_filename("main.c").unwrap().name, "c");
        assert_eq!(syntax_for_filename("lib.rs").unwrap().name, "rust");
        assert!(syntax_for_filename("notes.txt").is_none());
        // dot-prefixed patterns are extension matches, not substrings
        assert!(syntax_for_filename("march").is_none());
    }

    // ==================== single-line comment tests ====================

    #[test]
    fn line_comment_runs_to_end_of_row() {
        let hl = classes("int x; // comment");
        let comment_start = "int x; ".len();
        assert!(hl[comment_start..].iter().all(|&h| h == Highlight::Comment));
        // before the marker, normal rules apply
        assert_eq!(hl[0], Highlight::Keyword(KeywordClass::Type));
        assert_eq!(hl[4], Highlight::Normal); // 'x'
    }

    #[test]
    fn comment_marker_inside_string_is_text() {
        let hl = classes("\"no // comment\"");
        assert!(hl.iter().all(|&h| h == Highlight::String));
    }

    // ==================== multi-line comment tests ====================

    #[test]
    fn multiline_comment_opens_and_reports_state() {
        let (hl, open) = scan_row(c_syntax(), "a /* b", false);
        assert!(open);
        assert_eq!(hl[0], Highlight::Normal);
        assert!(hl[2..].iter().all(|&h| h == Highlight::MultilineComment));
    }

    #[test]
    fn inherited_comment_closes_mid_row() {
        let (hl, open) = scan_row(c_syntax(), "end */ int", true);
        assert!(!open);
        assert!(hl[..6].iter().all(|&h| h == Highlight::MultilineComment));
        assert_eq!(hl[7], Highlight::Keyword(KeywordClass::Type));
    }

    #[test]
    fn comment_on_one_row_both_markers() {
        let (hl, open) = scan_row(c_syntax(), "x /* y */ z", false);
        assert!(!open);
        assert_eq!(hl[0], Highlight::Normal);
        assert!(hl[2..9].iter().all(|&h| h == Highlight::MultilineComment));
        assert_eq!(hl[10], Highlight::Normal);
    }

    // ==================== string tests ====================

    #[test]
    fn string_closes_on_matching_quote_only() {
        let hl = classes("'a\"b' x");
        assert!(hl[..5].iter().all(|&h| h == Highlight::String));
        assert_eq!(hl[6], Highlight::Normal);
    }

    #[test]
    fn backslash_escapes_closing_quote() {
        let hl = classes(r#""a\"b" x"#);
        assert!(hl[..6].iter().all(|&h| h == Highlight::String));
        assert_eq!(hl[7], Highlight::Normal);
    }

    // ==================== number tests ====================

    #[test]
    fn digits_after_separator_are_numbers() {
        let hl = classes("x = 42;");
        assert_eq!(hl[4], Highlight::Number);
        assert_eq!(hl[5], Highlight::Number);
    }

    #[test]
    fn dot_continues_a_number() {
        let hl = classes("3.14");
        assert!(hl.iter().all(|&h| h == Highlight::Number));
    }

    #[test]
    fn digits_inside_identifier_are_not_numbers() {
        let hl = classes("x2");
        assert_eq!(hl[1], Highlight::Normal);
    }

    // ==================== keyword tests ====================

    #[test]
    fn keywords_require_whole_word() {
        let hl = classes("if x");
        assert_eq!(hl[0], Highlight::Keyword(KeywordClass::Flow));
        assert_eq!(hl[1], Highlight::Keyword(KeywordClass::Flow));

        // prefix of a longer identifier is not a keyword
        let hl = classes("iffy");
        assert!(hl.iter().all(|&h| h == Highlight::Normal));

        // nor is a keyword not preceded by a separator
        let hl = classes("xif y");
        assert!(hl[..3].iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn keyword_at_end_of_row_matches() {
        let hl = classes("return");
        assert!(hl.iter().all(|&h| h == Highlight::Keyword(KeywordClass::Flow)));
    }

    #[test]
    fn keyword_classes_are_distinct() {
        let hl = classes("int if");
        assert_eq!(hl[0], Highlight::Keyword(KeywordClass::Type));
        assert_eq!(hl[4], Highlight::Keyword(KeywordClass::Flow));
    }
}
