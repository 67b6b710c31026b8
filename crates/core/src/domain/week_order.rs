use super::WeekId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renumber {
    pub week_id: WeekId,
    pub week_num: i32,
}

pub fn next_week_num(existing: usize) -> i32 {
    i32::try_from(existing).map_or(i32::MAX, |count| count.saturating_add(1))
}

// The result is ordered by ascending target number so the updates can be
// applied one by one without breaking a `(semester_id, week_num)` unique index.
pub fn renumber_after_removal(removed: i32, remaining: &[(WeekId, i32)]) -> Vec<Renumber> {
    let mut later: Vec<(WeekId, i32)> = remaining
        .iter()
        .copied()
        .filter(|&(_, num)| num > removed)
        .collect();
    later.sort_by_key(|&(_, num)| num);

    later
        .into_iter()
        .map(|(week_id, num)| Renumber {
            week_id,
            week_num: num - 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weeks(nums: &[i32]) -> Vec<(WeekId, i32)> {
        nums.iter()
            .map(|&num| (WeekId::new(num * 10), num))
            .collect()
    }

    #[test]
    fn later_weeks_shift_down() {
        let remaining = weeks(&[5, 1, 2, 4]);

        let updates = renumber_after_removal(3, &remaining);

        assert_eq!(
            updates,
            vec![
                Renumber {
                    week_id: WeekId::new(40),
                    week_num: 3
                },
                Renumber {
                    week_id: WeekId::new(50),
                    week_num: 4
                },
            ]
        );
    }

    #[test]
    fn result_is_contiguous() {
        let mut remaining = weeks(&[1, 2, 4, 5, 6]);
        for update in renumber_after_removal(3, &remaining) {
            if let Some(entry) = remaining.iter_mut().find(|(id, _)| *id == update.week_id) {
                entry.1 = update.week_num;
            }
        }

        let mut nums: Vec<i32> = remaining.iter().map(|&(_, num)| num).collect();
        nums.sort_unstable();
        assert_eq!(nums, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn removing_last_week_changes_nothing() {
        assert!(renumber_after_removal(3, &weeks(&[1, 2])).is_empty());
    }

    #[test]
    fn appended_week_follows_existing() {
        assert_eq!(next_week_num(0), 1);
        assert_eq!(next_week_num(4), 5);
    }
}
