//! Semantic validation and AST → render-ready transformation.
//!
//! Compilation either fully succeeds and returns an immutable [`Compiled`],
//! or fails on the first violated constraint.

use std::collections::HashMap;

use serde::Serialize;

use crate::ast::{Ast, SiteType, SpliceSite, Transcript};
use crate::colour::Colour;
use crate::error::CompileError;
use crate::nl43;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompiledFragment {
    pub start: u32,
    pub end: u32,
    pub colour: Option<Colour>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledTranscript {
    pub fragments: Vec<CompiledFragment>,
    /// Blanked when it repeats the label of the transcript above.
    pub label: Option<String>,
    pub group: Option<String>,
    pub comment: Option<String>,
}

/// A contiguous run of transcripts sharing one `group` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledGroup {
    pub name: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledSplicingSite {
    pub name: String,
    pub position: u32,
    #[serde(rename = "type")]
    pub site_type: SiteType,
    pub colour: Option<Colour>,
}

/// Fully validated plot description handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiled {
    pub title: Option<String>,
    pub transcripts: Vec<CompiledTranscript>,
    pub groups: Vec<CompiledGroup>,
    pub splicing_sites: Vec<CompiledSplicingSite>,
}

/// Compile against the NL4-3 genome end.
pub fn compile(ast: &Ast) -> Result<Compiled, CompileError> {
    compile_with(ast, nl43::GENOME_END)
}

/// Compile, resolving `end` fragment ends to `genome_end`.
pub fn compile_with(ast: &Ast, genome_end: u32) -> Result<Compiled, CompileError> {
    check_unique_names(&ast.donors, SiteType::Donor)?;
    check_unique_names(&ast.acceptors, SiteType::Acceptor)?;

    let boundaries = Boundaries::new(ast, genome_end);

    let transcripts = ast
        .transcripts
        .iter()
        .enumerate()
        .map(|(i, transcript)| boundaries.compile_transcript(i + 1, transcript))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Compiled {
        title: ast.title.clone(),
        transcripts: dedup_labels(transcripts),
        groups: derive_groups(&ast.transcripts),
        splicing_sites: splicing_sites(ast),
    })
}

fn check_unique_names(sites: &[SpliceSite], site_type: SiteType) -> Result<(), CompileError> {
    let mut by_name: Vec<(&str, Vec<u32>)> = Vec::new();
    for site in sites {
        match by_name.iter_mut().find(|(name, _)| *name == site.name) {
            Some((_, positions)) => positions.push(site.position),
            None => by_name.push((site.name.as_str(), vec![site.position])),
        }
    }

    match by_name.into_iter().find(|(_, positions)| positions.len() > 1) {
        Some((name, positions)) => Err(CompileError::DuplicateSiteName {
            site_type,
            name: name.to_string(),
            positions,
        }),
        None => Ok(()),
    }
}

/// Legal fragment boundaries and the colours attached to them.
struct Boundaries {
    genome_end: u32,
    /// `1` followed by acceptor positions, declaration order, no repeats.
    valid_starts: Vec<u32>,
    /// Genome end followed by donor positions, declaration order, no repeats.
    valid_ends: Vec<u32>,
    start_colours: HashMap<u32, Option<Colour>>,
    end_colours: HashMap<u32, Option<Colour>>,
}

impl Boundaries {
    fn new(ast: &Ast, genome_end: u32) -> Self {
        Self {
            genome_end,
            valid_starts: positions(1, &ast.acceptors),
            valid_ends: positions(genome_end, &ast.donors),
            start_colours: colour_map(1, &ast.acceptors),
            end_colours: colour_map(genome_end, &ast.donors),
        }
    }

    fn compile_transcript(
        &self,
        transcript_num: usize,
        transcript: &Transcript,
    ) -> Result<CompiledTranscript, CompileError> {
        if transcript.fragments.is_empty() {
            return Err(CompileError::EmptyTranscript {
                transcript: transcript_num,
            });
        }

        let mut fragments = Vec::with_capacity(transcript.fragments.len());
        for (i, fragment) in transcript.fragments.iter().enumerate() {
            let fragment_num = i + 1;
            let start = fragment.start;
            let end = fragment.end.resolve(self.genome_end);

            let start_colour = self.start_colours.get(&start).copied().flatten();
            let end_colour = self.end_colours.get(&end).copied().flatten();
            let colour = match (start_colour, end_colour) {
                (Some(a), Some(b)) if a != b => {
                    return Err(CompileError::ConflictingFragmentColours {
                        transcript: transcript_num,
                        fragment: fragment_num,
                        start,
                        end,
                        start_colour: a,
                        end_colour: b,
                    });
                }
                (a, b) => a.or(b),
            };

            if !self.valid_starts.contains(&start) {
                return Err(CompileError::InvalidFragmentStart {
                    transcript: transcript_num,
                    fragment: fragment_num,
                    start,
                    valid_starts: self.valid_starts.clone(),
                });
            }
            if !self.valid_ends.contains(&end) {
                return Err(CompileError::InvalidFragmentEnd {
                    transcript: transcript_num,
                    fragment: fragment_num,
                    end,
                    valid_ends: self.valid_ends.clone(),
                });
            }

            // only `end` can resolve below its start; numeric ends are checked by the parser
            if end < start {
                return Err(CompileError::EndBeforeStart {
                    transcript: transcript_num,
                    fragment: fragment_num,
                    start,
                    end,
                });
            }

            fragments.push(CompiledFragment { start, end, colour });
        }

        for (i, pair) in fragments.windows(2).enumerate() {
            let (current, next) = (pair[0], pair[1]);
            if current.end >= next.start {
                return Err(CompileError::OverlappingFragments {
                    transcript: transcript_num,
                    fragment: i + 1,
                    current: (current.start, current.end),
                    next: (next.start, next.end),
                });
            }
        }

        Ok(CompiledTranscript {
            fragments,
            label: transcript.label.clone(),
            group: transcript.group.clone(),
            comment: transcript.comment.clone(),
        })
    }
}

fn positions(implicit: u32, sites: &[SpliceSite]) -> Vec<u32> {
    let mut out = vec![implicit];
    for site in sites {
        if !out.contains(&site.position) {
            out.push(site.position);
        }
    }
    out
}

/// Position → colour lookup. The implicit boundary is colourless unless a
/// declared site at the same position says otherwise; later sites win.
fn colour_map(implicit: u32, sites: &[SpliceSite]) -> HashMap<u32, Option<Colour>> {
    std::iter::once((implicit, None))
        .chain(sites.iter().map(|site| (site.position, site.colour)))
        .collect()
}

/// Blank labels that repeat the most recent non-empty label, so a gene name
/// is printed once per run of consecutive isoforms.
fn dedup_labels(transcripts: Vec<CompiledTranscript>) -> Vec<CompiledTranscript> {
    let mut last_label: Option<String> = None;
    transcripts
        .into_iter()
        .map(|transcript| {
            if transcript.label.is_none() {
                transcript
            } else if transcript.label == last_label {
                CompiledTranscript {
                    label: None,
                    ..transcript
                }
            } else {
                last_label.clone_from(&transcript.label);
                transcript
            }
        })
        .collect()
}

/// Contiguous runs of equal `group` values. Separate runs of the same name
/// stay separate groups.
fn derive_groups(transcripts: &[Transcript]) -> Vec<CompiledGroup> {
    let mut groups: Vec<CompiledGroup> = Vec::new();
    for transcript in transcripts {
        match groups.last_mut() {
            Some(group) if group.name == transcript.group => group.size += 1,
            _ => groups.push(CompiledGroup {
                name: transcript.group.clone(),
                size: 1,
            }),
        }
    }
    groups
}

fn splicing_sites(ast: &Ast) -> Vec<CompiledSplicingSite> {
    let tagged = |sites: &[SpliceSite], site_type: SiteType| {
        sites
            .iter()
            .map(move |site| CompiledSplicingSite {
                name: site.name.clone(),
                position: site.position,
                site_type,
                colour: site.colour,
            })
            .collect::<Vec<_>>()
    };

    let mut out = tagged(&ast.donors, SiteType::Donor);
    out.extend(tagged(&ast.acceptors, SiteType::Acceptor));
    out
}
