// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reader for the five-section, 80-column IGES file grammar.
//!
//! Sections are classified by the letter in column 73. Directory Entries
//! arrive as pairs of fixed 8-column fields; Parameter Data is free format
//! under the delimiters declared in the Global section, with Hollerith
//! string constants (`nHtext`) and `D`-exponent reals.

use crate::error::{Error, Result};
use crate::global::GlobalData;
use crate::record::{DeField, DirectoryEntry, ParameterData, PdParam, RecordSet, StatusFlags};
use nom::{
    bytes::complete::take_while,
    character::complete::{char as nom_char, digit1, one_of},
    combinator::{map_res, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

/// Parse a whole IGES file into structured records
pub fn read_string(text: &str) -> Result<RecordSet> {
    let mut start = Vec::new();
    let mut global_text = String::new();
    let mut de_lines: Vec<&str> = Vec::new();
    let mut pd_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.len() < 73 {
            return Err(Error::Parse(format!(
                "record shorter than 73 columns: {:?}",
                line
            )));
        }

        let section = line.as_bytes()[72] as char;
        match section {
            'S' => start.push(line[..72].trim_end().to_string()),
            'G' => global_text.push_str(&line[..72]),
            'D' => de_lines.push(line),
            'P' => pd_lines.push(line),
            'T' => {}
            other => {
                return Err(Error::Parse(format!("unknown section letter {:?}", other)));
            }
        }
    }

    let global = parse_global(&global_text)?;
    let directory = parse_directory(&de_lines)?;
    let parameters = parse_parameters(&pd_lines, global.param_delim, global.record_delim)?;

    Ok(RecordSet {
        start,
        global,
        directory,
        parameters,
    })
}

/// Decode the global section: sniff the two delimiter parameters, then
/// tokenize the rest with them.
fn parse_global(text: &str) -> Result<GlobalData> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return Ok(GlobalData::default());
    }

    let pdelim = sniff_delim(trimmed, 0).unwrap_or(',');

    // parameter 2 follows the first delimiter
    let after_first = if trimmed.starts_with("1H") {
        // "1H<c><delim>..."
        4.min(trimmed.len())
    } else {
        1.min(trimmed.len())
    };
    let rdelim = sniff_delim(trimmed, after_first).unwrap_or(';');

    let params = tokenize_params(trimmed, pdelim, rdelim)?;
    GlobalData::from_params(&params)
}

/// A delimiter parameter is either the Hollerith `1H<c>` or defaulted
fn sniff_delim(text: &str, at: usize) -> Option<char> {
    let rest = text.get(at..)?;
    if rest.starts_with("1H") {
        rest.chars().nth(2)
    } else {
        None
    }
}

/// Decode the directory section: two 80-column lines of 8-column fields
/// per entity.
fn parse_directory(lines: &[&str]) -> Result<Vec<DirectoryEntry>> {
    if lines.len() % 2 != 0 {
        return Err(Error::Parse(format!(
            "directory section has {} lines; entries are line pairs",
            lines.len()
        )));
    }

    let mut out = Vec::with_capacity(lines.len() / 2);

    for chunk in lines.chunks_exact(2) {
        let (l1, l2) = (chunk[0], chunk[1]);

        let f1 = |i: usize| de_int(l1, i);
        let f2 = |i: usize| de_int(l2, i);

        let sequence = l1[73..80]
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::Parse(format!("bad DE sequence field: {:?}", &l1[72..])))?;

        let entity_type = f1(0)?;
        if f2(0)? != entity_type {
            return Err(Error::Parse(format!(
                "DE {} second line echoes type {} instead of {}",
                sequence,
                f2(0)?,
                entity_type
            )));
        }

        out.push(DirectoryEntry {
            entity_type,
            pd_pointer: f1(1)?.max(0) as u32,
            structure: DeField::from_negated(f1(2)?),
            line_font: DeField::from_negated(f1(3)?),
            level: DeField::from_negated(f1(4)?),
            view: DeField::from_pointer(f1(5)?),
            transform: DeField::from_pointer(f1(6)?),
            label_assoc: DeField::from_pointer(f1(7)?),
            status: StatusFlags::from_code(f1(8)?)?,
            line_weight: f2(1)?,
            color: DeField::from_negated(f2(2)?),
            pd_count: f2(3)?.max(0) as u32,
            form: f2(4)?,
            label: l2[56..64].trim().to_string(),
            subscript: f2(8)?,
            sequence,
        })
    }

    Ok(out)
}

/// One 8-column integer field of a DE line; blank means zero
fn de_int(line: &str, field: usize) -> Result<i32> {
    let s = line[field * 8..(field + 1) * 8].trim();
    if s.is_empty() {
        return Ok(0);
    }
    s.parse::<i32>()
        .map_err(|_| Error::Parse(format!("bad DE field {:?}", s)))
}

/// Decode the parameter section: group lines by their DE back-pointer,
/// join the 64-column data areas, and tokenize each group.
fn parse_parameters(lines: &[&str], pdelim: char, rdelim: char) -> Result<Vec<ParameterData>> {
    let mut groups: Vec<(u32, String)> = Vec::new();

    for line in lines {
        let de_seq = line[64..72]
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::Parse(format!("bad PD back-pointer: {:?}", &line[64..72])))?;

        match groups.last_mut() {
            Some((seq, text)) if *seq == de_seq => text.push_str(&line[..64]),
            _ => groups.push((de_seq, line[..64].to_string())),
        }
    }

    let mut out = Vec::with_capacity(groups.len());

    for (de_sequence, text) in groups {
        let mut params = tokenize_params(text.trim_end(), pdelim, rdelim)?;
        if params.is_empty() {
            return Err(Error::Parse(format!(
                "empty PD block for DE {}",
                de_sequence
            )));
        }

        let entity_type = params.remove(0).as_int().ok_or_else(|| {
            Error::Parse(format!("PD block for DE {} lacks a type code", de_sequence))
        })? as i32;

        out.push(ParameterData {
            entity_type,
            params,
            de_sequence,
        });
    }

    Ok(out)
}

/// Tokenize a free-format parameter list. Parameters are separated by the
/// parameter delimiter and the list ends at the record delimiter; an
/// empty slot is a defaulted parameter.
pub(crate) fn tokenize_params(text: &str, pdelim: char, rdelim: char) -> Result<Vec<PdParam>> {
    let mut params = Vec::new();
    let mut cur = text;
    let mut expecting = true;

    loop {
        cur = cur.trim_start();

        let Some(c) = cur.chars().next() else {
            if expecting && !params.is_empty() {
                params.push(PdParam::Default);
            }
            break;
        };

        if c == rdelim {
            if expecting && !params.is_empty() {
                params.push(PdParam::Default);
            }
            break;
        }

        if c == pdelim {
            if expecting {
                params.push(PdParam::Default);
            }
            cur = &cur[c.len_utf8()..];
            expecting = true;
            continue;
        }

        let (rest, param) = parse_value(cur)
            .map_err(|_| Error::Parse(format!("unparseable parameter at {:?}", truncate(cur))))?;
        params.push(param);
        cur = rest;
        expecting = false;
    }

    Ok(params)
}

fn truncate(s: &str) -> &str {
    &s[..s.len().min(24)]
}

/// A single value: Hollerith string, real, or integer
fn parse_value(input: &str) -> IResult<&str, PdParam> {
    if let Ok(r) = hollerith(input) {
        return Ok(r);
    }
    number(input)
}

/// Hollerith string constant: `nH` followed by exactly n characters
fn hollerith(input: &str) -> IResult<&str, PdParam> {
    let (rest, n) = map_res(digit1, |s: &str| s.parse::<usize>())(input)?;
    let (rest, _) = nom_char('H')(rest)?;

    if rest.len() < n {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    }

    let (content, rest) = rest.split_at(n);
    Ok((rest, PdParam::Text(content.to_string())))
}

/// Numeric constant. IGES reals may use a `D` exponent marker and may end
/// in a bare decimal point (`42.`).
fn number(input: &str) -> IResult<&str, PdParam> {
    let (rest, lit) = recognize(tuple((
        opt(one_of("+-")),
        take_while(|c: char| c.is_ascii_digit()),
        opt(pair(
            nom_char('.'),
            take_while(|c: char| c.is_ascii_digit()),
        )),
        opt(tuple((one_of("DdEe"), opt(one_of("+-")), digit1))),
    )))(input)?;

    if !lit.bytes().any(|b| b.is_ascii_digit()) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }

    let is_real = lit.contains(&['.', 'D', 'd', 'E', 'e'][..]);

    if is_real {
        let normalized = lit.replace(&['D', 'd'][..], "E");
        match fast_float::parse::<f64, _>(&normalized) {
            Ok(v) => Ok((rest, PdParam::Real(v))),
            Err(_) => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Float,
            ))),
        }
    } else {
        match lit.parse::<i64>() {
            Ok(v) => Ok((rest, PdParam::Integer(v))),
            Err(_) => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            ))),
        }
    }
}
