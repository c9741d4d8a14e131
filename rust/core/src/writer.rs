// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writer for the five-section, 80-column IGES file grammar.
//!
//! Parameters are packed greedily into the 64-column PD data area without
//! splitting a parameter across lines (Hollerith constants longer than a
//! line are the one exception). Each section numbers its lines from 1.

use crate::record::{DirectoryEntry, ParameterData, PdParam, RecordSet};

/// Width of the PD data area (columns 1-64)
const PD_WIDTH: usize = 64;

/// Width of the global data area (columns 1-72)
const GLOBAL_WIDTH: usize = 72;

/// Render a full record set as IGES file text
pub fn write_string(rs: &RecordSet) -> String {
    let mut out = String::new();

    // Start section
    let start_lines: Vec<String> = if rs.start.is_empty() {
        vec![String::new()]
    } else {
        rs.start.clone()
    };
    let mut start_count = 0usize;
    for line in &start_lines {
        let mut rest = line.as_str();
        loop {
            let (head, tail) = rest.split_at(rest.len().min(GLOBAL_WIDTH));
            start_count += 1;
            push_line(&mut out, head, 'S', start_count);
            if tail.is_empty() {
                break;
            }
            rest = tail;
        }
    }

    // Global section
    let global_params = rs.global.to_params();
    let global_lines = pack_params(
        &global_params,
        rs.global.param_delim,
        rs.global.record_delim,
        GLOBAL_WIDTH,
    );
    for (i, line) in global_lines.iter().enumerate() {
        push_line(&mut out, line, 'G', i + 1);
    }

    // Directory section
    for de in &rs.directory {
        let (l1, l2) = format_de(de);
        out.push_str(&l1);
        out.push('\n');
        out.push_str(&l2);
        out.push('\n');
    }

    // Parameter section
    let mut pd_seq = 1usize;
    for pd in &rs.parameters {
        for content in render_pd_lines(pd, rs.global.param_delim, rs.global.record_delim) {
            out.push_str(&format!(
                "{:<64} {:>7}P{:>7}\n",
                content, pd.de_sequence, pd_seq
            ));
            pd_seq += 1;
        }
    }

    // Terminate section
    let counts = format!(
        "S{:>7}G{:>7}D{:>7}P{:>7}",
        start_count,
        global_lines.len(),
        rs.directory.len() * 2,
        pd_seq - 1
    );
    push_line(&mut out, &counts, 'T', 1);

    out
}

fn push_line(out: &mut String, content: &str, section: char, seq: usize) {
    out.push_str(&format!("{:<72}{}{:>7}\n", content, section, seq));
}

/// Number of PD lines an entity's parameters occupy; used by the model to
/// assign PD pointers before rendering.
pub fn pd_line_count(pd: &ParameterData, pdelim: char, rdelim: char) -> usize {
    render_pd_lines(pd, pdelim, rdelim).len()
}

/// The entity's parameter text split into PD data-area lines
pub(crate) fn render_pd_lines(pd: &ParameterData, pdelim: char, rdelim: char) -> Vec<String> {
    let mut all = Vec::with_capacity(pd.params.len() + 1);
    all.push(PdParam::Integer(pd.entity_type as i64));
    all.extend(pd.params.iter().cloned());
    pack_params(&all, pdelim, rdelim, PD_WIDTH)
}

/// Greedy line packing: each parameter plus its trailing delimiter stays
/// on one line where possible.
fn pack_params(params: &[PdParam], pdelim: char, rdelim: char, width: usize) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::with_capacity(params.len());

    for (i, p) in params.iter().enumerate() {
        let mut t = format_param(p);
        t.push(if i + 1 == params.len() { rdelim } else { pdelim });
        tokens.push(t);
    }

    if tokens.is_empty() {
        tokens.push(rdelim.to_string());
    }

    let mut lines = Vec::new();
    let mut cur = String::new();

    for t in tokens {
        if cur.len() + t.len() <= width {
            cur.push_str(&t);
            continue;
        }

        if !cur.is_empty() {
            lines.push(cur.clone());
            cur.clear();
        }

        // oversized token (long Hollerith): hard-split across lines
        let mut rest = t.as_str();
        while rest.len() > width {
            let (head, tail) = rest.split_at(width);
            lines.push(head.to_string());
            rest = tail;
        }
        cur.push_str(rest);
    }

    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }

    lines
}

/// Render one parameter in free format
fn format_param(p: &PdParam) -> String {
    match p {
        PdParam::Integer(v) => v.to_string(),
        PdParam::Real(v) => format_real(*v),
        PdParam::Text(s) => format!("{}H{}", s.chars().count(), s),
        PdParam::Default => String::new(),
    }
}

/// Reals always carry a decimal point; magnitudes outside a comfortable
/// plain-decimal range use E notation.
fn format_real(v: f64) -> String {
    if v == 0.0 {
        return "0.0".to_string();
    }

    let a = v.abs();
    if (1e-4..1e8).contains(&a) {
        let mut s = format!("{}", v);
        if !s.contains('.') {
            s.push_str(".0");
        }
        s
    } else {
        let s = format!("{:E}", v);
        // "5E-7" -> "5.0E-7" so the mantissa keeps its point
        match s.split_once('E') {
            Some((m, e)) if !m.contains('.') => format!("{}.0E{}", m, e),
            _ => s,
        }
    }
}

/// The two fixed-column directory lines of one entry
fn format_de(de: &DirectoryEntry) -> (String, String) {
    let l1 = format!(
        "{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:0>8}D{:>7}",
        de.entity_type,
        de.pd_pointer,
        de.structure.to_negated(),
        de.line_font.to_negated(),
        de.level.to_negated(),
        de.view.to_pointer(),
        de.transform.to_pointer(),
        de.label_assoc.to_pointer(),
        de.status.to_code(),
        de.sequence
    );

    let label: String = de.label.chars().take(8).collect();
    let l2 = format!(
        "{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}D{:>7}",
        de.entity_type,
        de.line_weight,
        de.color.to_negated(),
        de.pd_count,
        de.form,
        "",
        "",
        label,
        de.subscript,
        de.sequence + 1
    );

    (l1, l2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global::GlobalData;
    use crate::record::StatusFlags;

    #[test]
    fn real_formatting() {
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(1.5), "1.5");

        // whole reals regain their decimal point
        assert_eq!(format_real(-3.0), "-3.0");
        assert_eq!(format_real(42.0), "42.0");

        // tiny magnitudes switch to E notation with a pointed mantissa
        let s = format_real(5e-7);
        assert!(s.contains('E'));
        assert!(s.contains('.'));
    }

    #[test]
    fn pd_lines_are_width_limited() {
        let pd = ParameterData {
            entity_type: 126,
            params: (0..50).map(|i| PdParam::Real(i as f64 + 0.5)).collect(),
            de_sequence: 1,
        };

        let lines = render_pd_lines(&pd, ',', ';');
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 64));
        assert!(lines.last().unwrap().ends_with(';'));
        assert_eq!(pd_line_count(&pd, ',', ';'), lines.len());
    }

    #[test]
    fn de_lines_are_80_columns() {
        let de = DirectoryEntry {
            entity_type: 110,
            pd_pointer: 1,
            pd_count: 1,
            status: StatusFlags::default(),
            sequence: 3,
            ..DirectoryEntry::default()
        };

        let (l1, l2) = format_de(&de);
        assert_eq!(l1.len(), 80);
        assert_eq!(l2.len(), 80);
        assert_eq!(&l1[72..73], "D");
        assert_eq!(l1[73..80].trim(), "3");
        assert_eq!(l2[73..80].trim(), "4");
    }

    #[test]
    fn file_round_trips_through_parser() {
        let mut rs = RecordSet {
            start: vec!["test model".to_string()],
            global: GlobalData::default(),
            ..RecordSet::default()
        };
        rs.global.product_id_sender = "BOARD".to_string();

        rs.directory.push(DirectoryEntry {
            entity_type: 110,
            pd_pointer: 1,
            pd_count: 1,
            sequence: 1,
            ..DirectoryEntry::default()
        });
        rs.parameters.push(ParameterData {
            entity_type: 110,
            params: vec![
                PdParam::Real(0.0),
                PdParam::Real(0.0),
                PdParam::Real(0.0),
                PdParam::Real(10.0),
                PdParam::Real(0.0),
                PdParam::Real(0.0),
            ],
            de_sequence: 1,
        });

        let text = write_string(&rs);
        assert!(text.lines().all(|l| l.len() == 80));

        let back = crate::parser::read_string(&text).unwrap();
        assert_eq!(back.start, vec!["test model".to_string()]);
        assert_eq!(back.global.product_id_sender, "BOARD");
        assert_eq!(back.directory.len(), 1);
        assert_eq!(back.directory[0].entity_type, 110);
        assert_eq!(back.parameters.len(), 1);
        assert_eq!(back.parameters[0].params.len(), 6);
        assert_eq!(back.parameters[0].params[3], PdParam::Real(10.0));
    }
}
