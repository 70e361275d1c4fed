use crate::cache::DatasetCache;
use crate::types::{Series, SeriesRequest};

/// Stitches the cached pieces of one desired series into plot-ready x/y
/// arrays. Pieces are paired with the x column over the same bounds, the
/// series offset is added to every x sample, and a single NaN sentinel marks
/// every uncovered region (leading, trailing or between pieces) so a line
/// renderer breaks there.
pub(crate) fn assemble_series(request: &SeriesRequest, cache: Option<&DatasetCache>) -> Series {
    let mut x = Vec::new();
    let mut y = Vec::new();

    let pieces = cache
        .map(|cache| cache.extract(&request.column, request.from, request.to))
        .unwrap_or_default();
    let mut cursor = request.from;
    for piece in &pieces {
        if piece.from() > cursor {
            push_gap(&mut x, &mut y);
        }
        // the x column was diffed and fetched together with the y column,
        // so normally this yields exactly one piece; holes are tolerated
        let x_pieces = cache
            .map(|cache| cache.extract(&request.x_column, piece.from(), piece.to()))
            .unwrap_or_default();
        let mut x_cursor = piece.from();
        for x_piece in &x_pieces {
            if x_piece.from() > x_cursor {
                push_gap(&mut x, &mut y);
            }
            let lo = (x_piece.from() - piece.from()) as usize;
            let hi = (x_piece.to() - piece.from()) as usize;
            x.extend(x_piece.values().iter().map(|v| v + request.offset));
            y.extend_from_slice(&piece.values()[lo..hi]);
            x_cursor = x_piece.to();
        }
        if x_cursor < piece.to() {
            push_gap(&mut x, &mut y);
        }
        cursor = piece.to();
    }
    if cursor < request.to {
        push_gap(&mut x, &mut y);
    }

    Series {
        label: request.label.clone(),
        color: request.color.clone(),
        x,
        y,
    }
}

fn push_gap(x: &mut Vec<f64>, y: &mut Vec<f64>) {
    // never emit two sentinels in a row
    if x.last().is_some_and(|last| last.is_nan()) {
        return;
    }
    x.push(f64::NAN);
    y.push(f64::NAN);
}
