use console::Style;
use itertools::Itertools;

use crate::board3d_prelude::*;


const BOARD_WIDTH: usize = (NUM_COLS as usize + 2) * 3;

fn format_square(ch: char) -> String { format!(" {} ", ch) }

// Spare tray of one force, as pictograms.
fn render_tray(force: Force) -> String {
    let pieces = SpareSquare::all()
        .filter(|spare| spare.force == force)
        .map(|spare| spare.piece().to_pictogram())
        .join(" ");
    format!(
        "{1:^0$}\n",
        BOARD_WIDTH,
        Style::new().color256(233).on_color256(194).apply_to(pieces)
    )
}

pub fn render_position(position: &Position, orientation: Orientation, spare_pieces: bool) -> String {
    let grid = render_grid(position, orientation);
    if !spare_pieces {
        return grid;
    }
    let top = orientation.bottom_force().opponent();
    let bottom = orientation.bottom_force();
    format!("{}{}{}", render_tray(top), grid, render_tray(bottom))
}

fn render_grid(position: &Position, orientation: Orientation) -> String {
    let colors = [
        Style::new().color256(233).on_color256(222),
        Style::new().color256(233).on_color256(230),
    ];
    let mut ret = String::new();
    for y in (-1)..=(NUM_ROWS as i32) {
        for x in (-1)..=(NUM_COLS as i32) {
            let row_header = x < 0 || x >= NUM_COLS.into();
            let col_header = y < 0 || y >= NUM_ROWS.into();
            // Any square of the header row or column tells which file or rank to print.
            let display = DisplayCoord {
                x: x.clamp(0, NUM_COLS as i32 - 1) as u8,
                y: y.clamp(0, NUM_ROWS as i32 - 1) as u8,
            };
            let Some(coord) = from_display_coord(display, orientation) else {
                continue;
            };
            let square = match (row_header, col_header) {
                (true, true) => format_square(' '),
                (true, false) => format_square(coord.row.to_algebraic()),
                (false, true) => format_square(coord.col.to_algebraic()),
                (false, false) => {
                    let color_idx = (coord.row.to_zero_based() + coord.col.to_zero_based()) % 2;
                    colors[usize::from(color_idx)]
                        .apply_to(format_square(match position.get(coord) {
                            Some(piece) => piece.to_pictogram(),
                            None => ' ',
                        }))
                        .to_string()
                }
            };
            ret.push_str(&square);
        }
        ret.push('\n');
    }
    ret
}

pub fn render_operations(operations: &[Operation]) -> String {
    if operations.is_empty() {
        return "(no changes)".to_owned();
    }
    operations
        .iter()
        .map(|op| {
            let style = match op.phase() {
                OperationPhase::Clear => Style::new().red(),
                OperationPhase::Move => Style::new().yellow(),
                OperationPhase::Add => Style::new().green(),
            };
            style.apply_to(format!("{op:?}")).to_string()
        })
        .join("\n")
}
