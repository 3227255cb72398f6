use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_engine::board::{Board, Side};

/// Draws the board with 1-based column labels; an asterisk above a column
/// marks the currently suggested move.
pub fn draw_board(board: &Board, suggestion: Option<usize>) -> Result<()> {
    let mut stdout = stdout();

    let labels: String = (1..=board.cols()).map(|c| c.to_string()).collect();
    stdout.queue(PrintStyledContent(style(format!(" {}\n", labels))))?;

    if let Some(column) = suggestion {
        let mut markers = String::from(" ");
        markers.extend((0..board.cols()).map(|c| if c == column { '*' } else { ' ' }));
        markers.push('\n');
        stdout.queue(PrintStyledContent(style(markers)))?;
    }

    for row in (0..board.rows()).rev() {
        stdout.queue(PrintStyledContent(style("|")))?;
        for col in 0..board.cols() {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match board.cell(row, col) {
                        Some(Side::Red) => Color::Red,
                        Some(Side::Yellow) => Color::Yellow,
                        None => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("|\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
