/// Extract the files of a +3 DSK image into a host folder

use clap::{arg, ArgAction, Command};
use plus3dsk::filesystem::header;
use plus3dsk::{read_dsk, FileEntry, Plus3FileSystem, Plus3Header, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

/// One extent as reported in the metadata sidecar
#[derive(Serialize)]
struct ExtentMeta {
    extent: u16,
    rc: u8,
    blocks: Vec<u8>,
}

/// Metadata sidecar written next to each extracted file with --meta
#[derive(Serialize)]
struct FileMeta {
    user: u8,
    name: String,
    ext: String,
    total_bytes_from_rc: usize,
    extents: Vec<ExtentMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plus3_header: Option<Plus3Header>,
    output_name: String,
    output_size: usize,
    header_kept: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("dskextract")
        .about("Extract files from a ZX Spectrum +3 / PCW DSK image")
        .arg(arg!(--keepheader "keep +3DOS 128-byte headers (default: strip when present)")
            .action(ArgAction::SetTrue))
        .arg(arg!(--meta "write a .json metadata file alongside each extracted file")
            .action(ArgAction::SetTrue))
        .arg(arg!(<image> "DSK image to read"))
        .arg(arg!(<outdir> "folder to extract into"))
        .get_matches();

    let image = matches.get_one::<String>("image").expect("required");
    let outdir = matches.get_one::<String>("outdir").expect("required");
    let keep_header = matches.get_flag("keepheader");
    let write_meta = matches.get_flag("meta");

    match run(image, Path::new(outdir), keep_header, write_meta) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dskextract: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(image_path: &str, outdir: &Path, keep_header: bool, write_meta: bool) -> Result<()> {
    fs::create_dir_all(outdir)?;

    let image = read_dsk(image_path)?;
    let filesystem = Plus3FileSystem::open(&image)?;
    let files = filesystem.files();
    if files.is_empty() {
        println!("No files found.");
        return Ok(());
    }

    for file in &files {
        let assembled = filesystem.read_file(file);
        let save_name = file.output_name();
        let save_path = outdir.join(&save_name);

        let (plus3_header, out_data, had_header) = match header::peel(&assembled) {
            Some((hdr, body)) => {
                let data = if keep_header { &assembled[..] } else { body };
                (Some(hdr), data, true)
            }
            None => (None, &assembled[..], false),
        };

        if let Err(err) = fs::write(&save_path, out_data) {
            eprintln!("dskextract: write error {}: {}", save_name, err);
            continue;
        }
        println!("Extracted {} ({} bytes)", save_name, out_data.len());

        if write_meta {
            let meta = file_meta(
                file,
                plus3_header,
                &save_name,
                out_data.len(),
                keep_header && had_header,
            );
            // Metadata is best-effort; a failed sidecar never aborts the run
            if let Ok(json) = serde_json::to_string_pretty(&meta) {
                let json_path = outdir.join(format!("{}.json", save_name));
                let _ = fs::write(json_path, json);
            }
        }
    }
    Ok(())
}

fn file_meta(
    file: &FileEntry,
    plus3_header: Option<Plus3Header>,
    output_name: &str,
    output_size: usize,
    header_kept: bool,
) -> FileMeta {
    let extents = file
        .extents
        .iter()
        .map(|e| ExtentMeta {
            extent: e.extent_number(),
            rc: e.record_count,
            blocks: e.block_list(),
        })
        .collect();

    let name = if file.name.is_empty() {
        "NONAME".to_string()
    } else {
        file.name.clone()
    };

    FileMeta {
        user: file.user,
        name,
        ext: file.ext.clone(),
        total_bytes_from_rc: file.size_from_rc,
        extents,
        plus3_header,
        output_name: output_name.to_string(),
        output_size,
        header_kept,
    }
}
