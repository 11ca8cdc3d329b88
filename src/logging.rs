use std::io::Write;
use std::sync::Once;

/// Install the stderr logger. Level defaults to `info`; `RUST_LOG` overrides it.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{} {:<8} [anvio-launch] {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.args()
                )
            })
            .try_init();
    });
}
