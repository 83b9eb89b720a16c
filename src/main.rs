use std::path::PathBuf;
use std::process::exit;

use structopt::StructOpt;

use aslc::code::code_gen;
use aslc::prog_load::program_load;

#[derive(Debug, StructOpt)]
#[structopt(name = "aslc", about = "Compiles Asl source into three-address t-code.")]
enum App {
    #[structopt(about = "Checks that an Asl source file is semantically valid")]
    Check {
        #[structopt(parse(from_os_str))]
        source_file: PathBuf,
    },
    #[structopt(about = "Compiles an Asl source file to t-code")]
    Compile {
        #[structopt(parse(from_os_str))]
        source_file: PathBuf,
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
}

fn main() {
    match App::from_args() {
        App::Check { source_file } => {
            if program_load(&source_file).is_err() {
                exit(1)
            }
        }
        App::Compile {
            source_file,
            output,
        } => match program_load(&source_file) {
            Ok(prog) => {
                let code = code_gen(&prog);
                match output {
                    Some(path) => {
                        std::fs::write(path, code.to_string()).expect("cannot write output file")
                    }
                    None => print!("{}", code),
                }
            }
            Err(()) => exit(1),
        },
    }
}
