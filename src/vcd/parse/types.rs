// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
#[derive(Debug)]
pub(super) struct ParseResult<'a> {
    pub(super) matched: &'a str,
    pub(super) residual: &'a str,
}

/// The closed set of `$` keywords a VCD stream may contain.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Keyword {
    // declaration keywords
    Comment,
    Date,
    EndDefinitions,
    Scope,
    Timescale,
    Upscope,
    Var,
    Version,
    // simulation keywords
    DumpAll,
    DumpOff,
    DumpOn,
    DumpVars,
    End,
}

impl Keyword {
    pub(super) fn from_word(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "$comment" => Keyword::Comment,
            "$date" => Keyword::Date,
            "$enddefinitions" => Keyword::EndDefinitions,
            "$scope" => Keyword::Scope,
            "$timescale" => Keyword::Timescale,
            "$upscope" => Keyword::Upscope,
            "$var" => Keyword::Var,
            "$version" => Keyword::Version,
            "$dumpall" => Keyword::DumpAll,
            "$dumpoff" => Keyword::DumpOff,
            "$dumpon" => Keyword::DumpOn,
            "$dumpvars" => Keyword::DumpVars,
            "$end" => Keyword::End,
            _ => return None,
        };
        Some(keyword)
    }

    pub(super) fn as_str(&self) -> &'static str {
        match self {
            Keyword::Comment => "$comment",
            Keyword::Date => "$date",
            Keyword::EndDefinitions => "$enddefinitions",
            Keyword::Scope => "$scope",
            Keyword::Timescale => "$timescale",
            Keyword::Upscope => "$upscope",
            Keyword::Var => "$var",
            Keyword::Version => "$version",
            Keyword::DumpAll => "$dumpall",
            Keyword::DumpOff => "$dumpoff",
            Keyword::DumpOn => "$dumpon",
            Keyword::DumpVars => "$dumpvars",
            Keyword::End => "$end",
        }
    }

    /// Keywords that open a block of value changes.
    pub(super) fn is_dump_block(&self) -> bool {
        matches!(
            self,
            Keyword::DumpAll | Keyword::DumpOff | Keyword::DumpOn | Keyword::DumpVars
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for word in [
            "$comment",
            "$date",
            "$enddefinitions",
            "$scope",
            "$timescale",
            "$upscope",
            "$var",
            "$version",
            "$dumpall",
            "$dumpoff",
            "$dumpon",
            "$dumpvars",
            "$end",
        ] {
            assert_eq!(Keyword::from_word(word).unwrap().as_str(), word);
        }
        assert!(Keyword::from_word("$dumpports").is_none());
        assert!(Keyword::from_word("scope").is_none());
    }
}
