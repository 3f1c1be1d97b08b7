use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, io_utils, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let frame = io_utils::read_workbook(&args.input, "preview")?;
    print!("{}", table::render_frame(&frame, args.rows));
    info!(
        "Displayed {} of {} row(s) from {:?}",
        frame.len().min(args.rows),
        frame.len(),
        args.input
    );
    Ok(())
}
