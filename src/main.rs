use anyhow::Result;

use std::io::{stdin, stdout, Stdin, Write};
use std::time::{Duration, Instant};

use connect4_engine::adaptive::{DifficultyLevel, GameSummary, SessionContext, Winner};
use connect4_engine::board::Side;
use connect4_engine::config::{GameConfig, Seat};
use connect4_engine::hint;
use connect4_engine::search::SearchEngine;

mod display;

const HUMAN_SIDE: Side = Side::Red;
const MACHINE_SIDE: Side = Side::Yellow;

fn main() -> Result<()> {
    println!("Welcome to Connect 4\n");

    let stdin = stdin();
    let config = prompt_config(&stdin)?;
    let mut session = SessionContext::new(config.level);
    // keep the engine out here so its cache is re-used across games
    let mut engine = SearchEngine::new();
    let mut history: Vec<GameSummary> = Vec::new();

    loop {
        let Some(summary) = play_game(&config, &mut session, &mut engine, &stdin)? else {
            break;
        };
        match summary.winner {
            Winner::Human => println!("\nYou win!"),
            Winner::Machine => println!("\nThe AI wins!"),
            Winner::Draw => println!("\nDraw!"),
        }
        session.finish_game(&summary);
        history.push(summary);

        let profile = session.controller.profile();
        println!(
            "Difficulty for the next game: {:?} at depth {}, imperfection {:.0}%",
            profile.level,
            profile.depth,
            profile.imperfection_rate * 100.0
        );

        if !prompt_yes_no(&stdin, "Play another game? y/n: ")? {
            break;
        }
    }

    report_session(&history, &session);
    Ok(())
}

/// Plays one game to its end. Returns `None` if the player quit mid-game.
fn play_game(
    config: &GameConfig,
    session: &mut SessionContext,
    engine: &mut SearchEngine,
    stdin: &Stdin,
) -> Result<Option<GameSummary>> {
    let mut board = config.board()?;
    let mut turn = match config.first_mover {
        Seat::Human => HUMAN_SIDE,
        Seat::Machine => MACHINE_SIDE,
    };

    let game_start = Instant::now();
    let mut human_moves = 0u32;
    let mut machine_moves = 0u32;
    let mut machine_think_time = Duration::ZERO;
    let mut machine_nodes = 0usize;
    let mut hints_used = 0u32;
    let mut suggestion: Option<usize> = None;

    let winner = loop {
        display::draw_board(&board, suggestion)?;
        suggestion = None;

        if turn == HUMAN_SIDE {
            let prompt_start = Instant::now();
            print!("Move input ('h' for a hint, 'q' to quit) > ");
            stdout().flush()?;
            let mut buffer = String::new();
            stdin.read_line(&mut buffer)?;

            match buffer.trim() {
                "q" => return Ok(None),
                "h" => {
                    let column = hint::suggest(engine, &mut board, HUMAN_SIDE, session)?;
                    hints_used += 1;
                    suggestion = Some(column);
                    println!("Suggested move: column {}", column + 1);
                    continue;
                }
                text => {
                    let Ok(column_one_indexed) = text.parse::<usize>() else {
                        println!("Invalid input: {}", text);
                        continue;
                    };
                    if column_one_indexed < 1 || column_one_indexed > board.cols() {
                        println!(
                            "Invalid move, columns must be between 1 and {}",
                            board.cols()
                        );
                        continue;
                    }
                    let column = column_one_indexed - 1;
                    let row = match board.drop_piece(column, HUMAN_SIDE) {
                        Ok(row) => row,
                        Err(err) => {
                            println!("{}", err);
                            continue;
                        }
                    };
                    session.tracker.record_human_move(prompt_start.elapsed());
                    human_moves += 1;
                    if board.winner_at(row, column).is_some() {
                        break Winner::Human;
                    }
                }
            }
        } else {
            println!("AI is thinking...");
            stdout().flush()?;

            let search_config = session.controller.search_config();
            let outcome = engine.best_move(&mut board, MACHINE_SIDE, &search_config)?;
            let row = board.drop_piece(outcome.column, MACHINE_SIDE)?;
            machine_moves += 1;
            machine_think_time += outcome.elapsed;
            machine_nodes += outcome.nodes_explored;

            println!(
                "AI plays column {} (score {}, {} nodes, depth {}, {} ms)",
                outcome.column + 1,
                outcome.score,
                outcome.nodes_explored,
                outcome.depth_reached,
                outcome.elapsed.as_millis()
            );
            if board.winner_at(row, outcome.column).is_some() {
                break Winner::Machine;
            }
        }

        if board.is_full() {
            break Winner::Draw;
        }
        turn = turn.opponent();
    };

    display::draw_board(&board, None)?;
    Ok(Some(GameSummary {
        winner,
        human_moves,
        machine_moves,
        machine_think_time,
        machine_nodes,
        hints_used,
        duration: game_start.elapsed(),
    }))
}

fn prompt_config(stdin: &Stdin) -> Result<GameConfig> {
    println!("Select the board size:");
    println!("1. Standard (6x7)");
    println!("2. Compact (5x4)");
    let size_choice = prompt_choice(stdin, "Option (1-2): ", 2)?;

    println!("\nSelect the difficulty:");
    println!("1. Easy");
    println!("2. Medium");
    println!("3. Hard");
    let level = match prompt_choice(stdin, "Option (1-3): ", 3)? {
        1 => DifficultyLevel::Easy,
        2 => DifficultyLevel::Medium,
        _ => DifficultyLevel::Hard,
    };

    println!("\nWho moves first?");
    println!("1. You");
    println!("2. The AI");
    let first_mover = match prompt_choice(stdin, "Option (1-2): ", 2)? {
        1 => Seat::Human,
        _ => Seat::Machine,
    };
    println!();

    Ok(match size_choice {
        2 => GameConfig::compact(level, first_mover),
        _ => GameConfig::standard(level, first_mover),
    })
}

fn prompt_choice(stdin: &Stdin, prompt: &str, max: usize) -> Result<usize> {
    loop {
        print!("{}", prompt);
        stdout().flush()?;
        let mut buffer = String::new();
        stdin.read_line(&mut buffer)?;
        match buffer.trim().parse::<usize>() {
            Ok(choice) if (1..=max).contains(&choice) => return Ok(choice),
            _ => println!("Please enter a number between 1 and {}", max),
        }
    }
}

fn prompt_yes_no(stdin: &Stdin, prompt: &str) -> Result<bool> {
    loop {
        print!("{}", prompt);
        stdout().flush()?;
        let mut buffer = String::new();
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn report_session(history: &[GameSummary], session: &SessionContext) {
    if history.is_empty() {
        return;
    }

    println!("\nSession results:");
    for (index, game) in history.iter().enumerate() {
        let winner = match game.winner {
            Winner::Human => "you",
            Winner::Machine => "the AI",
            Winner::Draw => "nobody",
        };
        println!(
            "  Game {}: won by {} after {} moves ({} hints, AI thought {:.1}s over {} nodes)",
            index + 1,
            winner,
            game.human_moves + game.machine_moves,
            game.hints_used,
            game.machine_think_time.as_secs_f64(),
            game.machine_nodes,
        );
    }

    let human_wins = history
        .iter()
        .filter(|g| g.winner == Winner::Human)
        .count();
    let machine_wins = history
        .iter()
        .filter(|g| g.winner == Winner::Machine)
        .count();
    let draws = history.len() - human_wins - machine_wins;
    let total_think: Duration = history.iter().map(|g| g.machine_think_time).sum();
    let total_nodes: usize = history.iter().map(|g| g.machine_nodes).sum();

    println!(
        "  Totals: {} games, you {} - {} AI, {} drawn",
        history.len(),
        human_wins,
        machine_wins,
        draws
    );
    println!(
        "  AI thought for {:.1}s in total over {} nodes",
        total_think.as_secs_f64(),
        total_nodes
    );
    if let Some(latency) = session.tracker.average_human_latency() {
        println!("  Your average move time: {:.1}s", latency.as_secs_f64());
    }
    println!("  Hints used: {}", session.tracker.hints_used());
}
