//! Section parser: turns sectioned CSV text into the typed [`Ast`].
//!
//! Only syntax is checked here (required fields, integers, `start-end`
//! tokens). Cross-references between fragments and splice sites are the
//! compiler's job.

use std::collections::HashMap;

use crate::ast::{Ast, Fragment, FragmentEnd, SiteType, SpliceSite, Transcript};
use crate::colour::Colour;
use crate::error::{Error, FragmentContext, ParseError};
use crate::sections::{Section, Sections};

pub const TITLE: &str = "title";
pub const TRANSCRIPTS: &str = "transcripts";
pub const DONORS: &str = "donors";
pub const ACCEPTORS: &str = "acceptors";

/// Keyword standing for the genome's terminal coordinate in a fragment end.
const END_KEYWORD: &str = "end";

/// Parse normalized text (see [`crate::lexer`]) into an AST.
pub fn parse_str(text: &str) -> Result<Ast, Error> {
    parse(&Sections::read(text))
}

/// Parse already-split sections into an AST.
pub fn parse(sections: &Sections) -> Result<Ast, Error> {
    let index = index_sections(sections)?;
    let found = || sections.names().map(str::to_string).collect::<Vec<_>>();

    let require = |name: &'static str| {
        index.get(name).copied().ok_or_else(|| ParseError::MissingSection {
            section: name,
            found: found(),
        })
    };

    let transcripts_section = require(TRANSCRIPTS)?;
    let donors_section = require(DONORS)?;
    let acceptors_section = require(ACCEPTORS)?;

    let title = match index.get(TITLE) {
        Some(section) => read_title(section)?,
        None => None,
    };

    Ok(Ast {
        title,
        transcripts: read_transcripts(transcripts_section)?,
        donors: read_sites(donors_section, SiteType::Donor)?,
        acceptors: read_sites(acceptors_section, SiteType::Acceptor)?,
    })
}

/// Names of sections the parser does not read, in declaration order.
///
/// A line holding only `[text]` always opens a section, so a bracketed
/// title cell turns up here rather than as the title.
#[must_use]
pub fn unrecognized_sections(sections: &Sections) -> Vec<String> {
    sections
        .names()
        .filter(|name| {
            let key = name.to_lowercase();
            ![TITLE, TRANSCRIPTS, DONORS, ACCEPTORS].contains(&key.as_str())
        })
        .map(str::to_string)
        .collect()
}

/// Index sections by lowercased name, rejecting names that collide.
fn index_sections(sections: &Sections) -> Result<HashMap<String, &Section>, ParseError> {
    let mut groups: Vec<(String, Vec<&Section>)> = Vec::new();
    for section in sections.iter() {
        let key = section.name.to_lowercase();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(section),
            None => groups.push((key, vec![section])),
        }
    }

    let duplicates: Vec<Vec<String>> = groups
        .iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(_, members)| members.iter().map(|s| s.name.clone()).collect())
        .collect();
    if !duplicates.is_empty() {
        return Err(ParseError::DuplicateSections { duplicates });
    }

    Ok(groups
        .into_iter()
        .map(|(key, members)| (key, members[0]))
        .collect())
}

/// The title section holds at most one non-empty row with one non-empty cell.
fn read_title(section: &Section) -> Result<Option<String>, Error> {
    let nonempty: Vec<Vec<String>> = section
        .records()?
        .into_iter()
        .filter(|record| record.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    match nonempty.as_slice() {
        [] => Ok(None),
        [row] => {
            let values: Vec<&str> = row
                .iter()
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .collect();
            match values.as_slice() {
                [title] => Ok(Some((*title).to_string())),
                _ => Err(ParseError::TitleTooManyColumns { row: row.clone() }.into()),
            }
        }
        _ => Err(ParseError::TitleTooManyRows { rows: nonempty }.into()),
    }
}

fn read_transcripts(section: &Section) -> Result<Vec<Transcript>, Error> {
    let mut transcripts = Vec::new();

    for row in section.rows()? {
        if row.is_blank() {
            continue;
        }

        let fragments = match row.non_blank("fragments") {
            Some(fragments) => parse_fragments(fragments)?,
            None => return Err(ParseError::MissingFragments { row: row.clone() }.into()),
        };

        transcripts.push(Transcript {
            fragments,
            label: row.non_blank("label").map(str::to_string),
            group: row.non_blank("group").map(str::to_string),
            comment: row.non_blank("comment").map(str::to_string),
        });
    }

    Ok(transcripts)
}

/// Parse a `;`-separated list of `start-end` tokens, e.g. `"1-743;4913-end"`.
pub fn parse_fragments(fragments: &str) -> Result<Vec<Fragment>, ParseError> {
    let mut parsed = Vec::new();
    let mut offset = 0;

    for token in fragments.split(';') {
        let context = FragmentContext {
            previous: fragments[..offset].to_string(),
            next: fragments[offset + token.len()..].to_string(),
        };
        parsed.push(parse_fragment(token, context)?);
        offset += token.len() + 1;
    }

    Ok(parsed)
}

fn parse_fragment(token: &str, context: FragmentContext) -> Result<Fragment, ParseError> {
    let fragment = token.trim();
    if fragment.is_empty() {
        return Err(ParseError::EmptyFragment { context });
    }

    let (start_str, end_str) = match fragment.split_once('-') {
        Some((start, end)) if !end.contains('-') => (start.trim(), end.trim()),
        _ => {
            return Err(ParseError::InvalidDashPattern {
                fragment: fragment.to_string(),
                context,
            });
        }
    };

    let start: u32 = match start_str.parse() {
        Ok(start) => start,
        Err(_) => {
            return Err(ParseError::NotIntegerStart {
                start: start_str.to_string(),
                fragment: fragment.to_string(),
                context,
            });
        }
    };
    if start < 1 {
        return Err(ParseError::NotPositiveStart {
            start,
            fragment: fragment.to_string(),
            context,
        });
    }

    if end_str.eq_ignore_ascii_case(END_KEYWORD) {
        return Ok(Fragment {
            start,
            end: FragmentEnd::GenomeEnd,
        });
    }

    let end: u32 = match end_str.parse() {
        Ok(end) => end,
        Err(_) => {
            return Err(ParseError::NotIntegerEnd {
                end: end_str.to_string(),
                fragment: fragment.to_string(),
                context,
            });
        }
    };
    if end < 1 {
        return Err(ParseError::NotPositiveEnd {
            end,
            fragment: fragment.to_string(),
            context,
        });
    }
    if end < start {
        return Err(ParseError::EndLessThanStart {
            start,
            end,
            fragment: fragment.to_string(),
            context,
        });
    }

    Ok(Fragment {
        start,
        end: FragmentEnd::Position(end),
    })
}

fn read_sites(section: &Section, site_type: SiteType) -> Result<Vec<SpliceSite>, Error> {
    let mut sites = Vec::new();

    for row in section.rows()? {
        if row.is_blank() {
            continue;
        }

        let Some(name) = row.non_blank("name").map(str::to_string) else {
            return Err(ParseError::MissingSiteName { site_type, row }.into());
        };

        let Some(position_str) = row.non_blank("position") else {
            return Err(ParseError::MissingSitePosition {
                site_type,
                name,
                row: row.clone(),
            }
            .into());
        };
        let Ok(position) = position_str.parse::<u32>() else {
            return Err(ParseError::InvalidSitePosition {
                site_type,
                name,
                position: position_str.to_string(),
                row: row.clone(),
            }
            .into());
        };

        let colour = match row.non_blank("colour").or_else(|| row.non_blank("color")) {
            Some(value) => match value.parse::<Colour>() {
                Ok(colour) => Some(colour),
                Err(_) => {
                    return Err(ParseError::InvalidSpliceSiteColour {
                        site_type,
                        name,
                        colour: value.to_string(),
                        row: row.clone(),
                    }
                    .into());
                }
            },
            None => None,
        };

        sites.push(SpliceSite {
            name,
            position,
            colour,
        });
    }

    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(transcripts: &str) -> String {
        format!(
            "[title]\nMy Plot Title\n\n\
             [donors]\nname,position\nD1,743\nD2,4962\n\n\
             [acceptors]\nname,position\nA1,4913\nA2,5390\n\n\
             [transcripts]\nfragments,label,group,comment\n{transcripts}"
        )
    }

    fn parse_err(text: &str) -> ParseError {
        match parse_str(text).unwrap_err() {
            Error::Parse(err) => err,
            other => panic!("expected parse error, got {other}"),
        }
    }

    fn fragment_err(fragments: &str) -> ParseError {
        parse_fragments(fragments).unwrap_err()
    }

    #[test]
    fn parse_full_example() {
        let ast = parse_str(&input(
            "1-743;4913-end,vif,,\n1-743;5390-end,vpu/env,group1,(note)\n",
        ))
        .unwrap();

        assert_eq!(ast.title.as_deref(), Some("My Plot Title"));
        assert_eq!(ast.donors.len(), 2);
        assert_eq!(ast.donors[0].name, "D1");
        assert_eq!(ast.donors[0].position, 743);
        assert_eq!(ast.acceptors[1].position, 5390);

        assert_eq!(ast.transcripts.len(), 2);
        let vif = &ast.transcripts[0];
        assert_eq!(
            vif.fragments,
            vec![
                Fragment {
                    start: 1,
                    end: FragmentEnd::Position(743)
                },
                Fragment {
                    start: 4913,
                    end: FragmentEnd::GenomeEnd
                },
            ]
        );
        assert_eq!(vif.label.as_deref(), Some("vif"));
        assert_eq!(vif.group, None);
        assert_eq!(vif.comment, None);

        let env = &ast.transcripts[1];
        assert_eq!(env.group.as_deref(), Some("group1"));
        assert_eq!(env.comment.as_deref(), Some("(note)"));
    }

    #[test]
    fn section_names_are_case_insensitive() {
        let text = "[TRANSCRIPTS]\nfragments\n1-end\n[Donors]\nname,position\n[ACCEPTORS]\nname,position\n";
        let ast = parse_str(text).unwrap();
        assert_eq!(ast.title, None);
        assert_eq!(ast.transcripts.len(), 1);
        assert!(ast.donors.is_empty());
    }

    #[test]
    fn missing_section_reports_found_names() {
        let text = "[title]\nT\n[Transcripts]\nfragments\n1-end\n[acceptors]\nname,position\n";
        assert_eq!(
            parse_err(text),
            ParseError::MissingSection {
                section: DONORS,
                found: vec![
                    "title".to_string(),
                    "Transcripts".to_string(),
                    "acceptors".to_string()
                ],
            }
        );
    }

    #[test]
    fn duplicate_sections_rejected() {
        let text = format!("{}\n[Donors]\nname,position\n", input("1-end\n"));
        assert_eq!(
            parse_err(&text),
            ParseError::DuplicateSections {
                duplicates: vec![vec!["donors".to_string(), "Donors".to_string()]],
            }
        );
    }

    #[test]
    fn empty_title_section() {
        let text = input("1-end\n").replace("My Plot Title", ",,");
        assert_eq!(parse_str(&text).unwrap().title, None);
    }

    #[test]
    fn title_with_two_rows() {
        let text = input("1-end\n").replace("My Plot Title", "First\nSecond");
        assert!(matches!(
            parse_err(&text),
            ParseError::TitleTooManyRows { rows } if rows.len() == 2
        ));
    }

    #[test]
    fn title_with_two_columns() {
        let text = input("1-end\n").replace("My Plot Title", "First,Second");
        assert_eq!(
            parse_err(&text),
            ParseError::TitleTooManyColumns {
                row: vec!["First".to_string(), "Second".to_string()]
            }
        );
    }

    #[test]
    fn title_padding_cells_ignored() {
        let text = input("1-end\n").replace("My Plot Title", " My Plot Title ,,");
        assert_eq!(
            parse_str(&text).unwrap().title.as_deref(),
            Some("My Plot Title")
        );
    }

    #[test]
    fn title_cell_in_brackets_starts_a_section() {
        let text = input("1-end\n").replace("My Plot Title", "[Draft]");
        assert_eq!(parse_str(&text).unwrap().title, None);

        let sections = Sections::read(&text);
        assert_eq!(unrecognized_sections(&sections), vec!["Draft".to_string()]);

        let quoted = input("1-end\n").replace("My Plot Title", "\"[Draft]\"");
        assert_eq!(parse_str(&quoted).unwrap().title.as_deref(), Some("[Draft]"));
        assert!(unrecognized_sections(&Sections::read(&quoted)).is_empty());
    }

    #[test]
    fn known_sections_are_recognized_in_any_case() {
        let text = "[TITLE]\nT\n[Donors]\n[acceptors]\n[Transcripts]\n[notes]\n";
        assert_eq!(
            unrecognized_sections(&Sections::read(text)),
            vec!["notes".to_string()]
        );
    }

    #[test]
    fn missing_fragments_is_an_error() {
        let err = parse_err(&input(",vif,,\n"));
        match err {
            ParseError::MissingFragments { row } => assert_eq!(row.get("label"), Some("vif")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_rows_are_skipped() {
        let ast = parse_str(&input("1-end,vif,,\n,,,\n")).unwrap();
        assert_eq!(ast.transcripts.len(), 1);
    }

    #[test]
    fn end_keyword_is_case_insensitive() {
        let fragments = parse_fragments("1-743; 4913 - END ").unwrap();
        assert_eq!(fragments[1].end, FragmentEnd::GenomeEnd);
        assert_eq!(fragments[1].start, 4913);
    }

    #[test]
    fn empty_fragment_carries_context() {
        assert_eq!(
            fragment_err("1-743;;4913-end"),
            ParseError::EmptyFragment {
                context: FragmentContext {
                    previous: "1-743;".to_string(),
                    next: ";4913-end".to_string(),
                }
            }
        );
    }

    #[test]
    fn dash_pattern() {
        assert!(matches!(
            fragment_err("1-743;4913"),
            ParseError::InvalidDashPattern { fragment, .. } if fragment == "4913"
        ));
        assert!(matches!(
            fragment_err("1-2-3"),
            ParseError::InvalidDashPattern { .. }
        ));
    }

    #[test]
    fn missing_end_value_reports_context() {
        match fragment_err("1-743;743-;5390-end") {
            ParseError::NotIntegerEnd {
                end,
                fragment,
                context,
            } => {
                assert_eq!(end, "");
                assert_eq!(fragment, "743-");
                assert_eq!(context.previous, "1-743;");
                assert_eq!(context.next, ";5390-end");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_integer_start_reports_context() {
        match fragment_err("abc-900;4913-end") {
            ParseError::NotIntegerStart { start, context, .. } => {
                assert_eq!(start, "abc");
                assert_eq!(context.previous, "");
                assert_eq!(context.next, ";4913-end");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_positive_coordinates() {
        assert!(matches!(
            fragment_err("0-743"),
            ParseError::NotPositiveStart { start: 0, .. }
        ));
        assert!(matches!(
            fragment_err("1-0"),
            ParseError::NotPositiveEnd { end: 0, .. }
        ));
    }

    #[test]
    fn end_before_start() {
        assert!(matches!(
            fragment_err("4913-743"),
            ParseError::EndLessThanStart {
                start: 4913,
                end: 743,
                ..
            }
        ));
    }

    #[test]
    fn single_position_fragment() {
        let fragments = parse_fragments("743-743").unwrap();
        assert_eq!(fragments[0].end, FragmentEnd::Position(743));
    }

    #[test]
    fn site_errors() {
        let missing_name = input("1-end\n").replace("D1,743", ",743");
        assert!(matches!(
            parse_err(&missing_name),
            ParseError::MissingSiteName {
                site_type: SiteType::Donor,
                ..
            }
        ));

        let missing_position = input("1-end\n").replace("A1,4913", "A1,");
        assert!(matches!(
            parse_err(&missing_position),
            ParseError::MissingSitePosition { site_type: SiteType::Acceptor, name, .. } if name == "A1"
        ));

        let bad_position = input("1-end\n").replace("D2,4962", "D2,49x2");
        match parse_err(&bad_position) {
            ParseError::InvalidSitePosition {
                site_type,
                name,
                position,
                row,
            } => {
                assert_eq!(site_type, SiteType::Donor);
                assert_eq!(name, "D2");
                assert_eq!(position, "49x2");
                assert_eq!(row.get("position"), Some("49x2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn site_colours() {
        let text = input("1-end\n")
            .replace("name,position\nD1", "name,position,colour\nD1")
            .replace("D1,743", "D1,743,Red");
        let ast = parse_str(&text).unwrap();
        assert_eq!(ast.donors[0].colour, Some(Colour::Red));
        assert_eq!(ast.donors[1].colour, None);

        let american = input("1-end\n")
            .replace("name,position\nA1", "name,position,color\nA1")
            .replace("A2,5390", "A2,5390,gray");
        let ast = parse_str(&american).unwrap();
        assert_eq!(ast.acceptors[1].colour, Some(Colour::Grey));
    }

    #[test]
    fn invalid_site_colour() {
        let text = input("1-end\n")
            .replace("name,position\nD1", "name,position,colour\nD1")
            .replace("D2,4962", "D2,4962,magenta");
        assert!(matches!(
            parse_err(&text),
            ParseError::InvalidSpliceSiteColour { name, colour, .. } if name == "D2" && colour == "magenta"
        ));
    }

    #[test]
    fn headers_are_normalized() {
        let text = input("1-end,vif,,\n").replace(
            "fragments,label,group,comment",
            " Fragments ,LABEL,Group,Comment",
        );
        let ast = parse_str(&text).unwrap();
        assert_eq!(ast.transcripts[0].label.as_deref(), Some("vif"));
    }
}
