//! Print document assembly
//!
//! A document is an ordered list of statements that renders to a single
//! PostScript page: the barcode library preamble, two QR code invocations
//! and a monospace transcript of both keys.

use std::fmt;

use zeroize::Zeroize;

use crate::logic::postscript::{chunks, string_literal};
use crate::model::{BarcodePlacement, CorrectionLevel, EncodingSpec, KeyPair, Layout};
use crate::ports::PreambleFragment;

const BARCODE_INVOCATION: &str = "/qrcode /uk.co.terryburton.bwipp findresource exec";

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Barcode library code, relayed verbatim
    Preamble(String),
    Header,
    PageSize {
        width: u32,
        height: u32,
    },
    Barcode {
        placement: BarcodePlacement,
        /// Payload source segments; the payload is their concatenation
        segments: Vec<String>,
        level: CorrectionLevel,
    },
    SetFont {
        name: String,
        size: u32,
    },
    Text {
        x: f64,
        y: f64,
        line: String,
    },
    ShowPage,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    statements: Vec<Statement>,
}

impl Document {
    #[cfg(test)]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    #[cfg(test)]
    pub fn barcode_payloads(&self) -> Vec<String> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::Barcode { segments, .. } => Some(segments.concat()),
                _ => None,
            })
            .collect()
    }

    #[cfg(test)]
    pub fn text_lines(&self) -> Vec<&str> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::Text { line, .. } => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        for statement in &mut self.statements {
            match statement {
                Statement::Barcode { segments, .. } => segments.iter_mut().for_each(Zeroize::zeroize),
                Statement::Text { line, .. } => line.zeroize(),
                _ => {}
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preamble: Vec<&str> = self
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Preamble(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        write!(f, "{}\n\n", preamble.join("\n"))?;

        for statement in &self.statements {
            match statement {
                Statement::Preamble(_) => {}
                Statement::Header => f.write_str("%!PS\n\n")?,
                Statement::PageSize { width, height } => {
                    write!(f, "<< /PageSize [{width} {height}] >> setpagedevice\n\n")?
                }
                Statement::Barcode {
                    placement,
                    segments,
                    level,
                } => {
                    let scale = placement.scale;
                    write!(
                        f,
                        "{} {} moveto {} (width={scale} height={scale} eclevel={level})\n{BARCODE_INVOCATION}\n\n",
                        placement.x,
                        placement.y,
                        string_literal(segments.iter().map(String::as_str)),
                    )?
                }
                Statement::SetFont { name, size } => {
                    writeln!(f, "/{name} findfont {size} scalefont setfont")?
                }
                Statement::Text { x, y, line } => {
                    writeln!(f, "{x} {y} moveto {} show", string_literal([line.as_str()]))?
                }
                Statement::ShowPage => f.write_str("\nshowpage\n")?,
                Statement::Eof => f.write_str("%%EOF\n")?,
            }
        }
        Ok(())
    }
}

/// Lines of the printed transcript
///
/// The private key lines, one blank line, then the public key in chunks.
pub fn transcript(keys: &KeyPair, chunk_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = keys.private().as_str().lines().map(str::to_string).collect();
    lines.push(String::new());
    lines.extend(
        chunks(keys.public().as_str(), chunk_width)
            .into_iter()
            .map(str::to_string),
    );
    lines
}

/// Assemble the print document for `keys`
///
/// Pure: the same inputs always give the same document, whatever order the
/// fragments arrive in.
pub fn assemble(
    keys: &KeyPair,
    spec: &EncodingSpec,
    mut fragments: Vec<PreambleFragment>,
    layout: &Layout,
) -> Document {
    fragments.sort_by(|a, b| a.name.cmp(&b.name));

    let mut statements: Vec<Statement> = fragments
        .into_iter()
        .map(|fragment| Statement::Preamble(fragment.text))
        .collect();

    statements.push(Statement::Header);
    statements.push(Statement::PageSize {
        width: layout.page_width,
        height: layout.page_height,
    });

    statements.push(Statement::Barcode {
        placement: layout.private_barcode,
        segments: keys
            .private()
            .as_str()
            .split_inclusive('\n')
            .map(str::to_string)
            .collect(),
        level: spec.correction_level,
    });
    statements.push(Statement::Barcode {
        placement: layout.public_barcode,
        segments: chunks(keys.public().as_str(), layout.chunk_width)
            .into_iter()
            .map(str::to_string)
            .collect(),
        level: spec.correction_level,
    });

    statements.push(Statement::SetFont {
        name: layout.font.clone(),
        size: layout.font_size,
    });
    statements.extend(
        transcript(keys, layout.chunk_width)
            .into_iter()
            .enumerate()
            .map(|(i, line)| Statement::Text {
                x: layout.text_x,
                y: layout.line_y(i),
                line,
            }),
    );

    statements.push(Statement::ShowPage);
    statements.push(Statement::Eof);

    Document { statements }
}
