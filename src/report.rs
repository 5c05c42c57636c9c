use pixv::PixvError;

pub fn report_error(err: &PixvError) {
    match err {
        PixvError::InvalidScale { .. } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Pass a scale of 1 or more with --scale <n>");
            eprintln!("  or set environment variable {}", pixv::ENV_SCALE);
        }
        PixvError::UnknownStrategy(_) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Available methods: path, rectangle, square");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
