use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use super::{GrowMode, MatchableDecl, MatchableMaker, SaveContent};
use crate::Flags;

/// The most variants written in a single statement.
const VARIANTS_PER_STATEMENT: usize = 17;

const GENERATED_MATCHABLE: &str = "generated_matchable";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("no content selected")]
    NoContent,
    #[error("no grow mode given")]
    NoGrowMode,
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Returned after everything else was written.
    #[error("cyclic dependencies between {}; they were left out", skipped.join(", "))]
    CyclicDependencies { skipped: Vec<String> },
}

impl MatchableMaker {
    /// Writes the selected content to a new file at `path`, replacing any existing file.
    pub fn save_as(
        &self,
        path: impl AsRef<Path>,
        content: &Flags<SaveContent>,
        mode: impl Into<Option<GrowMode>>,
    ) -> Result<(), SaveError> {
        let (mode, rendered) = self.prepare(content, mode)?;
        let mut file = BufWriter::new(File::create(path.as_ref())?);
        file.write_all(rendered.text.as_bytes())?;
        file.flush()?;
        log::debug!(
            "saved {} matchables to {}",
            self.len() - rendered.skipped.len(),
            path.as_ref().display()
        );
        rendered.finish(mode)
    }

    /// Writes the selected content to `writer`.
    pub fn write_to<W: Write>(
        &self,
        mut writer: W,
        content: &Flags<SaveContent>,
        mode: impl Into<Option<GrowMode>>,
    ) -> Result<(), SaveError> {
        let (mode, rendered) = self.prepare(content, mode)?;
        writer.write_all(rendered.text.as_bytes())?;
        rendered.finish(mode)
    }

    fn prepare(
        &self,
        content: &Flags<SaveContent>,
        mode: impl Into<Option<GrowMode>>,
    ) -> Result<(GrowMode, Rendered), SaveError> {
        if content.currently_set().is_empty() {
            return Err(SaveError::NoContent);
        }
        let mode = mode.into().ok_or(SaveError::NoGrowMode)?;
        Ok((mode, self.render(content, mode)))
    }

    fn render(&self, content: &Flags<SaveContent>, mode: GrowMode) -> Rendered {
        let mut rendered = Rendered {
            text: String::from("// generated by matchable::maker\n\n"),
            skipped: Vec::new(),
        };

        if content.is_set(SaveContent::GeneratedMatchable) {
            let names: Vec<&str> = self.matchables.keys().map(String::as_str).collect();
            let head = match mode {
                GrowMode::Wrap => {
                    rendered.line(format!("MATCHABLE_FWD({GENERATED_MATCHABLE})"));
                    "MATCHABLE"
                }
                GrowMode::Always => "MATCHABLE_GROW",
            };
            rendered.statements(head, GENERATED_MATCHABLE, &names);
        }

        if content.is_set(SaveContent::Matchables) {
            let (ordered, skipped) = match mode {
                GrowMode::Wrap => self.dependency_order(),
                GrowMode::Always => (self.matchables.values().collect(), Vec::new()),
            };

            for decl in &ordered {
                rendered.line(format!("MATCHABLE_FWD({})", decl.name));
            }
            for decl in &ordered {
                rendered.matchable(decl, mode);
            }
            for decl in &ordered {
                rendered.set_spreads(decl);
            }
            rendered.skipped = skipped;
        }

        rendered
    }

    /// Declarations ordered so that every type comes after the types it spreads to,
    /// and the names of those caught in a cycle.
    fn dependency_order(&self) -> (Vec<&MatchableDecl>, Vec<String>) {
        let mut done = BTreeSet::new();
        let mut ordered = Vec::with_capacity(self.matchables.len());

        loop {
            let before = ordered.len();
            for decl in self.matchables.values() {
                if done.contains(decl.name.as_str()) {
                    continue;
                }
                if decl.dependencies(self).all(|dependency| done.contains(dependency)) {
                    done.insert(decl.name.as_str());
                    ordered.push(decl);
                }
            }
            if ordered.len() == before {
                break;
            }
        }

        let skipped = self
            .matchables
            .keys()
            .filter(|name| !done.contains(name.as_str()))
            .cloned()
            .collect();
        (ordered, skipped)
    }
}

struct Rendered {
    text: String,
    skipped: Vec<String>,
}

impl Rendered {
    fn line(&mut self, line: String) {
        self.text.push_str(&line);
        self.text.push('\n');
    }

    /// Opens with `head(prefix.., name, ..)`, continuing with `MATCHABLE_GROW` every
    /// [VARIANTS_PER_STATEMENT] variants.
    fn statements(&mut self, head: &str, name: &str, variants: &[&str]) {
        self.statements_with_prefix(head, &[], name, variants);
    }

    fn statements_with_prefix(
        &mut self,
        head: &str,
        prefix: &[&str],
        name: &str,
        variants: &[&str],
    ) {
        let mut chunks = variants.chunks(VARIANTS_PER_STATEMENT);
        let first = chunks.next().unwrap_or_default();

        let args: Vec<&str> = prefix
            .iter()
            .copied()
            .chain([name])
            .chain(first.iter().copied())
            .collect();
        self.line(format!("{head}({})", args.join(", ")));

        for chunk in chunks {
            let args: Vec<&str> = [name].into_iter().chain(chunk.iter().copied()).collect();
            self.line(format!("MATCHABLE_GROW({})", args.join(", ")));
        }
    }

    fn matchable(&mut self, decl: &MatchableDecl, mode: GrowMode) {
        let variants: Vec<&str> = decl.variants.iter().map(|v| v.name.as_str()).collect();
        let suffix = match mode {
            GrowMode::Wrap => "",
            GrowMode::Always => "_GROW",
        };

        if decl.spreads.is_empty() {
            self.statements(&format!("MATCHABLE{suffix}"), &decl.name, &variants);
        } else {
            let prefix: Vec<&str> = decl
                .spreads
                .iter()
                .flat_map(|spread| [spread.ty.as_str(), spread.name.as_str()])
                .collect();
            let head = format!("SPREADx{}_MATCHABLE{suffix}", decl.spreads.len());
            self.statements_with_prefix(&head, &prefix, &decl.name, &variants);
        }
    }

    fn set_spreads(&mut self, decl: &MatchableDecl) {
        for variant in &decl.variants {
            for spread in &variant.spreads {
                if let Some(value) = &spread.value {
                    self.line(format!(
                        "SET_SPREAD({}, {}, {}, {value})",
                        decl.name, variant.name, spread.name
                    ));
                }
                if !spread.values.is_empty() {
                    self.line(format!(
                        "SET_SPREAD_VECT({}, {}, {}, {})",
                        decl.name,
                        variant.name,
                        spread.name,
                        spread.values.join(", ")
                    ));
                }
            }
        }
    }

    fn finish(self, mode: GrowMode) -> Result<(), SaveError> {
        if self.skipped.is_empty() {
            return Ok(());
        }
        log::warn!(
            "cyclic dependencies detected in {mode} mode, left out: {}",
            self.skipped.join(", ")
        );
        Err(SaveError::CyclicDependencies {
            skipped: self.skipped,
        })
    }
}
