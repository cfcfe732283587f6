use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;
use std::process::ExitCode;

use tgapak::commands::{list_archive, pack_directory, unpack_archive};
use tgapak::{
    ArchiveDriver, ArchiveOptions, AssumeYes, Compression, Confirm, Notifier, StdinPrompt,
    TgaPakError,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Verbose mode (-v for info, -vv for debug, -vvv for trace). Also switches to text-based progress"
    )]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Pack a directory of .tga files into a ZIP archive, trimming transparent borders.
    Pack {
        #[arg(help = "Directory containing .tga files")]
        directory: PathBuf,

        #[arg(
            short,
            long,
            help = "Archive to write (default: <DIRNAME>.ZIP next to the directory)"
        )]
        out: Option<PathBuf>,

        #[arg(short, long, help = "Overwrite an existing archive without asking")]
        yes: bool,

        #[arg(long, help = "Store entries without compression")]
        store: bool,

        #[arg(
            long,
            value_parser = clap::value_parser!(i32).range(0..=9),
            conflicts_with = "store",
            help = "Deflate compression level (0-9)"
        )]
        level: Option<i32>,
    },

    /// Restore the images of an archive into a directory.
    Unpack {
        #[arg(help = "Archive produced by `pack`")]
        archive: PathBuf,

        #[arg(short, long, help = "Directory to write (default: archive name without extension)")]
        out: Option<PathBuf>,

        #[arg(short, long, help = "Write into an existing directory without asking")]
        yes: bool,
    },

    /// Show the images stored in an archive and their crop records.
    List {
        #[arg(help = "Archive produced by `pack`")]
        archive: PathBuf,
    },
}

fn confirmation(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompt)
    }
}

fn run(cli: Cli, notifier: &Notifier) -> Result<()> {
    match cli.command {
        Command::Pack {
            directory,
            out,
            yes,
            store,
            level,
        } => {
            let options = ArchiveOptions {
                compression: if store {
                    Compression::Stored
                } else {
                    Compression::Deflated
                },
                level,
            };
            debug!("Archive options: {:?}", options);

            let driver = ArchiveDriver::new(notifier, options);
            let archive = pack_directory(&driver, &directory, out.as_deref(), &*confirmation(yes))?;
            notifier.finish();
            println!("Wrote {}", archive.display());
        }
        Command::Unpack { archive, out, yes } => {
            let driver = ArchiveDriver::new(notifier, ArchiveOptions::default());
            let output = unpack_archive(&driver, &archive, out.as_deref(), &*confirmation(yes))?;
            notifier.finish();
            println!("Extracted to {}", output.display());
        }
        Command::List { archive } => {
            let driver = ArchiveDriver::new(notifier, ArchiveOptions::default());
            for entry in list_archive(&driver, &archive)? {
                match entry.metadata {
                    Some(meta) => {
                        let b = meta.bounds;
                        println!(
                            "{:<32} {:>10} bytes  {}x{} cropped to [{}, {}, {}, {}]",
                            entry.name,
                            entry.stored_size,
                            meta.original_size.0,
                            meta.original_size.1,
                            b.left,
                            b.top,
                            b.right,
                            b.bottom
                        );
                    }
                    None => println!("{:<32} {:>10} bytes", entry.name, entry.stored_size),
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let notifier = Notifier::new(cli.verbose);

    let result = run(cli, &notifier);
    notifier.finish();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<TgaPakError>() {
            Some(TgaPakError::OverwriteDeclined(path)) => {
                eprintln!("{} left untouched. No changes made.", path.display());
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}
