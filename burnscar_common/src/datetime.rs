/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use chrono::{DateTime, NaiveDate, TimeDelta};

/// the 1970-01-01 epoch all day-offset date bands refer to
pub fn unix_epoch_date ()->NaiveDate {
    DateTime::UNIX_EPOCH.date_naive()
}

/// calendar date for a day offset relative to `epoch`. Returns `None` if the result is out of range
pub fn date_from_epoch_days (epoch: NaiveDate, days: i64)->Option<NaiveDate> {
    TimeDelta::try_days(days).and_then( |d| epoch.checked_add_signed(d))
}

/// number of days between `epoch` and `date` (negative if `date` is before `epoch`)
pub fn epoch_days (epoch: NaiveDate, date: NaiveDate)->i64 {
    date.signed_duration_since(epoch).num_days()
}

/// parse the `YYYY-MM-DD` dates used in FIRMS acquisition records
pub fn parse_iso_date (s: &str)->Option<NaiveDate> {
    NaiveDate::parse_from_str( s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_days() {
        let epoch = unix_epoch_date();
        assert_eq!( epoch, NaiveDate::from_ymd_opt(1970,1,1).unwrap());

        let d = date_from_epoch_days( epoch, 18_628).unwrap();
        assert_eq!( d, NaiveDate::from_ymd_opt(2021,1,1).unwrap());
        assert_eq!( epoch_days( epoch, d), 18_628);

        assert_eq!( date_from_epoch_days( epoch, 0), Some(epoch));
        assert!( date_from_epoch_days( epoch, i64::MAX).is_none());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!( parse_iso_date("2020-09-14"), NaiveDate::from_ymd_opt(2020,9,14));
        assert_eq!( parse_iso_date("14/09/2020"), None);
    }
}
