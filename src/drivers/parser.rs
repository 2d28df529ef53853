use crate::types::{Frame, PointFrame};

/// Prefix that marks a structured line.
pub const POINT_MARKER: &str = "P,";
/// Token separating coordinates from auxiliary columns.
pub const EXTRA_MARKER: &str = "D";

/// Decodes one line of the telemetry protocol.
///
/// `P,x1,y1,x2,y2,...[,D,a,b,...]` becomes a [`PointFrame`]; any other line is
/// passed through verbatim. Malformed structured lines come back as `#`
/// diagnostics instead of errors so they can share the raw text path.
pub fn parse(line: &str) -> Frame {
    if !line.starts_with(POINT_MARKER) {
        return Frame::RawLine(line.to_owned());
    }
    let body = line.strip_suffix(',').unwrap_or(line);
    // skip the leading marker token
    let tokens: Vec<&str> = body.split(',').skip(1).collect();
    let (coord_tokens, extra_tokens) = match tokens.iter().position(|t| *t == EXTRA_MARKER) {
        Some(d) => (&tokens[..d], &tokens[d + 1..]),
        None => (&tokens[..], &[] as &[&str]),
    };
    let mut floats = Vec::with_capacity(coord_tokens.len());
    for token in coord_tokens {
        match token.trim().parse::<f64>() {
            Ok(value) => floats.push(value),
            Err(_) => return Frame::RawLine(format!("# non-float '{token}' in: {line}")),
        }
    }
    if floats.len() < 2 {
        return Frame::RawLine(format!("# no coordinate data: {line}"));
    }
    // chunks_exact drops a dangling odd value
    let coords = floats.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
    let extra = extra_tokens.iter().map(|t| (*t).to_owned()).collect();
    Frame::Point(PointFrame::new(coords, extra))
}
