use nom::{
    IResult,
    bytes::complete::take_till1,
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ObjError {
    Syntax { line: usize, text: String },
    ZeroIndex { line: usize },
    IndexOutOfRange { line: usize, kind: &'static str, index: i64, count: usize },
    DegenerateFace { line: usize, corners: usize },
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::Syntax { line, text } => write!(f, "line {line}: cannot parse `{text}`"),
            ObjError::ZeroIndex { line } => write!(f, "line {line}: OBJ indices start at 1"),
            ObjError::IndexOutOfRange {
                line,
                kind,
                index,
                count,
            } => write!(f, "line {line}: {kind} index {index} out of range ({count} defined)"),
            ObjError::DegenerateFace { line, corners } => {
                write!(f, "line {line}: face has {corners} corners, need at least 3")
            }
        }
    }
}

impl std::error::Error for ObjError {}

/// A face corner with 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub v: usize,
    pub vt: Option<usize>,
    pub vn: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub line: usize,
    pub corners: Vec<Corner>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub faces: Vec<Face>,
}

type RawCorner = (i64, Option<i64>, Option<i64>);

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn number(input: &str) -> IResult<&str, f32> {
    preceded(space1, float)(input)
}

/// Three components; an optional fourth (`w`) is accepted and dropped.
fn vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, (x, y, z)) = tuple((number, number, number))(input)?;
    let (input, _) = opt(number)(input)?;
    Ok((input, [x, y, z]))
}

fn tex_coord(input: &str) -> IResult<&str, [f32; 2]> {
    let (input, u) = number(input)?;
    let (input, v) = opt(number)(input)?;
    let (input, _) = opt(number)(input)?;
    Ok((input, [u, v.unwrap_or(0.0)]))
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn corner(input: &str) -> IResult<&str, RawCorner> {
    let (input, v) = index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), index))),
    ))(input)?;
    let (vt, vn) = rest.unwrap_or((None, None));
    Ok((input, (v, vt, vn)))
}

fn corners(input: &str) -> IResult<&str, Vec<RawCorner>> {
    many1(preceded(space1, corner))(input)
}

fn finish<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    rest: &'a str,
    line: usize,
    text: &str,
) -> Result<O, ObjError> {
    all_consuming(terminated(parser, space0))(rest)
        .map(|(_, out)| out)
        .map_err(|_| ObjError::Syntax {
            line,
            text: text.to_string(),
        })
}

/// Resolves a 1-based or negative (relative) OBJ index against `count`
/// elements defined so far.
fn resolve(
    raw: i64,
    count: usize,
    line: usize,
    kind: &'static str,
) -> Result<usize, ObjError> {
    let resolved = match raw {
        0 => return Err(ObjError::ZeroIndex { line }),
        r if r > 0 => r - 1,
        r => count as i64 + r,
    };
    if resolved < 0 || resolved as usize >= count {
        return Err(ObjError::IndexOutOfRange {
            line,
            kind,
            index: raw,
            count,
        });
    }
    Ok(resolved as usize)
}

/// Parses Wavefront OBJ text. Grouping, smoothing and material statements
/// are accepted and ignored.
pub fn parse_obj(src: &str) -> Result<ObjData, ObjError> {
    let mut data = ObjData::default();

    for (i, raw_line) in src.lines().enumerate() {
        let line = i + 1;
        let text = raw_line
            .split_once('#')
            .map_or(raw_line, |(before, _)| before)
            .trim();
        if text.is_empty() {
            continue;
        }

        let (rest, key) = keyword(text).map_err(|_| ObjError::Syntax {
            line,
            text: text.to_string(),
        })?;

        match key {
            "v" => data.positions.push(finish(vector3, rest, line, text)?),
            "vn" => data.normals.push(finish(vector3, rest, line, text)?),
            "vt" => data.tex_coords.push(finish(tex_coord, rest, line, text)?),
            "f" => {
                let raw = finish(corners, rest, line, text)?;
                if raw.len() < 3 {
                    return Err(ObjError::DegenerateFace {
                        line,
                        corners: raw.len(),
                    });
                }
                let corners = raw
                    .into_iter()
                    .map(|(v, vt, vn)| -> Result<Corner, ObjError> {
                        Ok(Corner {
                            v: resolve(v, data.positions.len(), line, "vertex")?,
                            vt: vt
                                .map(|t| resolve(t, data.tex_coords.len(), line, "texture"))
                                .transpose()?,
                            vn: vn
                                .map(|n| resolve(n, data.normals.len(), line, "normal"))
                                .transpose()?,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                data.faces.push(Face { line, corners });
            }
            "o" | "g" | "s" | "mtllib" | "usemtl" | "l" | "p" => {}
            other => log::debug!("obj line {line}: ignoring `{other}` statement"),
        }
    }

    Ok(data)
}
