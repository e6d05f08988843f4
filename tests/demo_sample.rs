use legacy_date::{Demo, FCS_DATE, UtcOffset, Zone, read_date};

fn demo(today: &str, zone: Zone) -> Demo {
    let today = read_date(today, zone).unwrap();
    let fcs = read_date(FCS_DATE, zone).unwrap();
    Demo::new(today, fcs, zone)
}

#[test]
fn test_sample_output_in_utc() {
    let lines = demo("Tue Feb 20 1996 15:00 GMT", Zone::Utc).lines();
    assert_eq!(
        lines,
        vec![
            "It's not FCS yet. Be patient!",
            "You have 26 development days left",
            "Today is Tue Feb 20 1996 15:00:00 GMT+0000",
            "FCS day is Mon Mar 18 1996 00:00:00 GMT+0000",
            "Mon Dec 25 1995 00:00:00 GMT+0000",
            "Mon Dec 25 1995 00:00:00 GMT+0000",
            "Mon Dec 25 1995 09:30:00 GMT+0000",
            "Mon Dec 25 1995 00:00:00 GMT+0000",
            "95",
            "11",
            "25",
            "0",
            "0",
            "0",
            "1",
            "Mon Dec 25 1995 11:42:01 GMT+0000",
            "819891721000",
        ]
    );
}

#[test]
fn test_sample_output_in_pacific_time() {
    let zone = Zone::Fixed(UtcOffset::from_minutes(-480).unwrap());
    let lines = demo("March 18, 1996 23:30", zone).lines();
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], "It's FCS day, you shouldn't be looking at date/time functions!");
    assert_eq!(lines[1], "You have -1 development days left");
    assert_eq!(lines[2], "Today is Mon Mar 18 1996 23:30:00 GMT-0800");
    assert_eq!(lines[7], "Sun Dec 24 1995 16:00:00 GMT-0800");
    assert_eq!(lines[10], "24");
    assert_eq!(lines[14], "0");
    assert_eq!(lines[15], "Mon Dec 25 1995 11:42:01 GMT-0800");
    assert_eq!(lines[16], "819920521000");
}

#[test]
fn test_countdown_from_millisecond_today() {
    // 1996-03-17T00:00:00Z
    let lines = demo("827020800000", Zone::Utc).lines();
    assert_eq!(lines[1], "You have 1 development days left");
}

#[test]
fn test_report_written_line_by_line() {
    let demo = demo("Jan 1 1996", Zone::Utc);
    let mut out = Vec::new();
    demo.write_to(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let written: Vec<&str> = text.lines().collect();
    assert_eq!(written, demo.lines());
}
