// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Integration Tests: Concurrent Use
//!
//! Many threads share one logger handle while levels are emitted, registered
//! and reconfigured.

#[cfg(test)]
mod tests {
    use crate::common::{route_primary, CountingSink};
    use levelog::{Level, LineTrace, Logger, MemorySink, Mode, Sink};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    const THREADS: usize = 8;

    #[test]
    fn test_concurrent_info_with_mode_none_writes_nothing() {
        let logger = Logger::new();
        let counter = Arc::new(CountingSink::default());
        route_primary(&logger, counter.clone());
        logger.add_writer(counter.clone() as Arc<dyn Sink>);
        logger.set_mode(Mode::None);

        thread::scope(|s| {
            for t in 0..THREADS {
                let logger = logger.clone();
                s.spawn(move || {
                    for i in 0..1000 / THREADS {
                        logger.info(format_args!("thread {t} line {i}")).unwrap();
                    }
                });
            }
        });

        assert_eq!(counter.writes(), 0);
        assert_eq!(counter.bytes(), 0);
    }

    #[test]
    fn test_concurrent_add_level_allocates_distinct_ids() {
        let logger = Logger::new();
        let per_thread = 25;

        let registered: Vec<(String, Level)> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    let logger = &logger;
                    s.spawn(move || {
                        (0..per_thread)
                            .map(|i| {
                                let tag = format!("T{t}L{i}");
                                let level = logger.add_std_level(&tag, Mode::None, false);
                                (tag, level)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let ids: HashSet<Level> = registered.iter().map(|(_, level)| *level).collect();
        assert_eq!(ids.len(), THREADS * per_thread);
        assert!(ids.iter().all(|level| *level > Level::FATAL));

        for (tag, level) in &registered {
            assert_eq!(logger.tag_to_level(tag), *level, "tag {tag}");
        }
    }

    #[test]
    fn test_concurrent_emit_whole_lines_through_locked_sink() {
        let logger = Logger::new();
        let mem = MemorySink::new();
        logger
            .set_mode(Mode::Writer)
            .set_writer(mem.sink())
            .disable_timestamp()
            .set_line_trace_mode(LineTrace::Off);

        thread::scope(|s| {
            for t in 0..THREADS {
                let logger = logger.clone();
                s.spawn(move || {
                    for i in 0..100 {
                        logger.log(format_args!("{t}-{i}")).unwrap();
                    }
                });
            }
        });

        let out = mem.contents_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), THREADS * 100);
        assert!(lines.iter().all(|line| line.starts_with("[LOG]:\t")));
    }

    #[test]
    fn test_emit_while_reconfiguring() {
        let logger = Logger::new();
        let mem = MemorySink::new();
        logger
            .set_mode(Mode::Writer)
            .set_writer(mem.sink())
            .disable_timestamp()
            .set_line_trace_mode(LineTrace::Off);

        thread::scope(|s| {
            let writer = logger.clone();
            s.spawn(move || {
                for i in 0..500 {
                    writer.warn(i).unwrap();
                }
            });

            let toggler = logger.clone();
            s.spawn(move || {
                for i in 0..200 {
                    if i % 2 == 0 {
                        toggler.enable_color();
                    } else {
                        toggler.disable_color();
                    }
                    toggler.add_std_level(&format!("X{i}"), Mode::None, false);
                }
            });
        });

        // Writer mode never paints, whatever the color flag
        let out = mem.contents_string();
        assert_eq!(out.lines().count(), 500);
        assert!(!out.contains('\x1b'));
    }
}
