use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Half-month bonus window: the 1st to the 15th, or the 16th to the last day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FortnightPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FortnightPeriod {
    pub fn containing(date: NaiveDate) -> Self {
        if date.day() <= 15 {
            Self {
                start: date.with_day(1).unwrap_or(date),
                end: date.with_day(15).unwrap_or(date),
            }
        } else {
            Self {
                start: date.with_day(16).unwrap_or(date),
                end: last_day_of_month(date),
            }
        }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn starts_at(&self) -> DateTime<Local> {
        local(self.start.and_time(NaiveTime::MIN))
    }

    /// 23:59:59.999 on the last day.
    pub fn ends_at(&self) -> DateTime<Local> {
        local(self.end.and_time(NaiveTime::MIN) + Duration::milliseconds(86_399_999))
    }

    /// Whole days from `now` until the start of the last day, never negative.
    pub fn days_left(&self, now: DateTime<Local>) -> i64 {
        let end = local(self.end.and_time(NaiveTime::MIN));
        let millis = (end - now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }

        const DAY_MS: i64 = 86_400_000;
        (millis + DAY_MS - 1) / DAY_MS
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%d/%m/%Y"), self.end.format("%d/%m/%Y"))
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

fn local(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
