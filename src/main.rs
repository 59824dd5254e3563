fn main() {
    let exit_code = match safesys::cli::run() {
        Ok(code) => code,
        Err(err) => {
            println!("safesys: error: {}", err);
            1
        }
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
