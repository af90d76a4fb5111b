use std::io;

use crate::board3d_prelude::*;
use crate::{parse_position, tui};


pub struct DiffConfig {
    pub from: String,
    pub to: String,
}

pub fn run(config: DiffConfig) -> io::Result<()> {
    let old = parse_position(&config.from)?;
    let new = parse_position(&config.to)?;
    let operations = execution_order(&plan(&old, &new));
    println!("{}", tui::render_operations(&operations));
    Ok(())
}
