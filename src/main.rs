//! bitacora main entrypoint.

use bitacora::run;
use bitacora::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
