fn main() {
    if let Err(err) = pnl_merge::run() {
        pnl_merge::report_failure(&err);
        std::process::exit(1);
    }
}
