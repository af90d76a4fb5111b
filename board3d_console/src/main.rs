// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod tui;

mod animate;
mod board3d_prelude;
mod diff_positions;
mod simulate_drag;
mod validate;

use std::io;

use board3d_prelude::*;
use clap::{Command, arg};


fn main() -> io::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Board3d")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Headless chess board widget: positions, animations and drag gestures")
        .subcommand_required(true)
        .subcommand(
            Command::new("show")
                .about("Render a position")
                .arg(arg!(<position> "\"start\", a FEN or a JSON object of square -> piece code"))
                .arg(
                    arg!(--"orientation" <side>)
                        .value_parser(["white", "black"])
                        .default_value("white"),
                )
                .arg(arg!(--"spares" "Show spare piece trays")),
        )
        .subcommand(
            Command::new("validate")
                .about("Check whether a string is a valid FEN, square, piece code, move or position")
                .arg(arg!(<value> "String to check")),
        )
        .subcommand(
            Command::new("diff")
                .about("Print the animation operations between two positions")
                .arg(arg!(<from> "Starting position"))
                .arg(arg!(<to> "Target position")),
        )
        .subcommand(
            Command::new("animate")
                .about("Animate a position change on a headless board")
                .arg(arg!(<from> "Starting position"))
                .arg(arg!(<to> "Target position"))
                .arg(
                    arg!(--"fps" <n> "Frames per second")
                        .value_parser(clap::value_parser!(u32).range(1..=240))
                        .default_value("60"),
                )
                .arg(arg!(--"realtime" "Wait between frames"))
                .arg(arg!(--"config" <config_file> "Path to a yaml-serialized BoardConfig")),
        )
        .subcommand(
            Command::new("drag")
                .about("Drag a piece on a headless board and report the hooks it triggers")
                .arg(arg!(<position> "Starting position"))
                .arg(arg!(<from> "Square to pick the piece from, e.g. \"e2\" or \"sw1\""))
                .arg(arg!(<to> "Square to release the piece on, or \"offboard\""))
                .arg(arg!(--"trash" "Remove pieces released off the board"))
                .arg(arg!(--"config" <config_file> "Path to a yaml-serialized BoardConfig")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("show", sub_matches)) => {
            let position = parse_position(sub_matches.get_one::<String>("position").unwrap())?;
            let orientation = match sub_matches.get_one::<String>("orientation").unwrap().as_str() {
                "black" => Orientation::Black,
                _ => Orientation::White,
            };
            let spares = sub_matches.get_flag("spares");
            print!("{}", tui::render_position(&position, orientation, spares));
            Ok(())
        }
        Some(("validate", sub_matches)) => {
            validate::run(sub_matches.get_one::<String>("value").unwrap())
        }
        Some(("diff", sub_matches)) => diff_positions::run(diff_positions::DiffConfig {
            from: sub_matches.get_one::<String>("from").unwrap().clone(),
            to: sub_matches.get_one::<String>("to").unwrap().clone(),
        }),
        Some(("animate", sub_matches)) => animate::run(animate::AnimateConfig {
            from: sub_matches.get_one::<String>("from").unwrap().clone(),
            to: sub_matches.get_one::<String>("to").unwrap().clone(),
            fps: *sub_matches.get_one::<u32>("fps").unwrap(),
            realtime: sub_matches.get_flag("realtime"),
            board_config: read_config_file(sub_matches.get_one::<String>("config"))?,
        }),
        Some(("drag", sub_matches)) => {
            let mut board_config = read_config_file(sub_matches.get_one::<String>("config"))?;
            if sub_matches.get_flag("trash") {
                board_config.drop_off_board = DropOffBoard::Trash;
            }
            simulate_drag::run(simulate_drag::DragConfig {
                position: sub_matches.get_one::<String>("position").unwrap().clone(),
                from: sub_matches.get_one::<String>("from").unwrap().clone(),
                to: sub_matches.get_one::<String>("to").unwrap().clone(),
                board_config,
            })
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_config_file(filename: Option<&String>) -> io::Result<BoardConfig> {
    let Some(filename) = filename else {
        return Ok(BoardConfig::default());
    };
    let contents = std::fs::read_to_string(filename)?;
    serde_yaml::from_str(&contents).map_err(|err| {
        eprintln!("Error parsing config file {filename}: {err}");
        io::Error::new(io::ErrorKind::InvalidData, err)
    })
}

pub fn parse_position(s: &str) -> io::Result<Position> {
    PositionSource::parse(s).and_then(PositionSource::resolve).map_err(|err| {
        eprintln!("{err}");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })
}
