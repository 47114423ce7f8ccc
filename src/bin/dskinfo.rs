/// Summarise a DSK image: container, geometry and +3 directory

use clap::{arg, Command};
use plus3dsk::filesystem::cpm;
use plus3dsk::{read_dsk, Plus3FileSystem, Result};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("dskinfo")
        .about("Show the geometry and +3 directory of a DSK image")
        .arg(arg!(<image> "DSK image to inspect"))
        .get_matches();

    let path = matches.get_one::<String>("image").expect("required");

    match run(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dskinfo: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(path: &str) -> Result<()> {
    let image = read_dsk(path)?;

    println!("Disk: {}", path);
    println!(
        " Container: {}  Cylinders: {}  Sides: {}",
        image.format().name(),
        image.cylinders(),
        image.sides()
    );

    let plus3 = cpm::boot_spec(&image).is_some_and(|dpb| dpb.is_plus3_layout());
    if !plus3 {
        println!(" Not a +3 (PCW-180K) layout or missing +3 spec at T0,S1. Showing geometry only.");
        return Ok(());
    }
    println!(" +3 disk spec: present");

    let fs = match Plus3FileSystem::open(&image) {
        Ok(fs) => fs,
        Err(err) => {
            println!(" +3 spec found but directory not in +3 default layout: {}", err);
            return Ok(());
        }
    };

    if fs.entries().is_empty() {
        println!(" Directory: (empty)");
        return Ok(());
    }

    println!("\nRaw directory entries:");
    println!(" User  Name       Ext  Extent  RC   Blocks");
    for entry in fs.entries() {
        let blocks: Vec<String> = entry
            .block_list()
            .iter()
            .map(|b| b.to_string())
            .collect();
        println!(
            "  {:3}  {:<8}   {:<3}  {:5}  {:3}  {}",
            entry.user,
            entry.name_str(),
            entry.ext_str(),
            entry.extent_number(),
            entry.record_count,
            blocks.join(",")
        );
    }
    Ok(())
}
