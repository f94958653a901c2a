mod cli_model;
mod options;

use crate::config::VepJob;

pub fn process_cli() -> Result<VepJob, String> {
    let m = cli_model::cli_model().get_matches();
    // Set up logging
    utils::log_level::init_log(&m);
    options::handle_options(&m)
}
