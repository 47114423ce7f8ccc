/// Build a +3/PCW-180K DSK image from a folder of host files

use clap::{arg, Command};
use plus3dsk::{build_disk, emit_dsk, FileItem, Result};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("dskbuild")
        .about("Build a ZX Spectrum +3 / PCW DSK image from a folder of files")
        .arg(arg!(<folder> "folder whose files go onto the disk"))
        .arg(arg!(<output> "path of the DSK image to write"))
        .get_matches();

    let folder = matches.get_one::<String>("folder").expect("required");
    let output = matches.get_one::<String>("output").expect("required");

    match run(Path::new(folder), Path::new(output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dskbuild: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(folder: &Path, output: &Path) -> Result<()> {
    if !fs::metadata(folder)?.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a folder", folder.display()),
        )
        .into());
    }

    let mut items = Vec::new();
    collect_files(folder, &mut items)?;

    let image = build_disk(items)?;
    let bytes = emit_dsk(&image)?;
    fs::write(output, &bytes)?;
    println!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

/// Gather every regular file under `dir`, recursing into subfolders.
/// Symlinks are not followed.
fn collect_files(dir: &Path, items: &mut Vec<FileItem>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), items)?;
        } else if file_type.is_file() {
            items.push(FileItem {
                name: entry.file_name().to_string_lossy().into_owned(),
                data: fs::read(entry.path())?,
            });
        }
    }
    Ok(())
}
