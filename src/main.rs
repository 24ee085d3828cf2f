use smart_timetable::config::AppConfig;
use smart_timetable::downloader;
use smart_timetable::lookup::{DataStore, LookupError};
use std::env;
use std::path::Path;
use std::process;

/// Terminal lookup: resolve one roll number against the reference data,
/// print the ordered schedule and write the export artifact next to the
/// working directory.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <roll_no> [data_dir]", args[0]);
        process::exit(2);
    }
    let roll_no = args[1].trim();
    let config = if args.len() >= 3 {
        AppConfig::from_data_dir(Path::new(&args[2]))
    } else {
        AppConfig::default()
    };

    if let Err(e) = config.validate() {
        eprintln!("configuration error: {}", e);
        process::exit(1);
    }

    let store = DataStore::new(config);
    match store.lookup(roll_no) {
        Ok(schedule) => {
            let courses: Vec<String> = schedule.courses.iter().map(|c| c.to_string()).collect();
            println!(
                "Found courses for Roll No. {}: {}",
                schedule.roll_no,
                courses.join(", ")
            );
            println!();

            let today = chrono::Local::now().date_naive();
            println!(
                "  {:<8} {:<4} {:<24} {:<8} {:<4} {:<24} {}",
                "Date", "Day", "Session", "Subject", "Div", "Faculty", "Venue"
            );
            for entry in &schedule.entries {
                // Today's classes get a marker in the left margin.
                let marker = if entry.is_on(today) { "*" } else { " " };
                println!(
                    "{} {:<8} {:<4} {:<24} {:<8} {:<4} {:<24} {}",
                    marker,
                    entry.display_date(),
                    entry.day,
                    entry.session,
                    entry.subject,
                    entry.division,
                    entry.faculty,
                    entry.venue
                );
            }

            let filename = downloader::export_filename(&schedule.roll_no);
            match downloader::to_xlsx(&schedule.entries) {
                Ok(bytes) => match std::fs::write(&filename, bytes) {
                    Ok(()) => println!("\nSaved {}", filename),
                    Err(e) => eprintln!("could not write {}: {}", filename, e),
                },
                Err(e) => eprintln!("export failed: {}", e),
            }
        }
        Err(err @ LookupError::NotEnrolled(_)) => println!("{}", err),
        Err(err @ LookupError::NoScheduleMatch { .. }) => println!("{}", err),
        Err(LookupError::Data(e)) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
