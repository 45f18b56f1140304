//! Binds scheduled titles to days and time slots and writes per-slot text.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

use crate::style::StyleProfile;

use super::{DayPlan, Itinerary, SLOTS_PER_DAY, Slot, SlotKind};

/// Switches between the plain and the varied itinerary wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssemblerOptions {
    /// Draw one theme per day from the profile's theme pool.
    pub themed_days: bool,
    /// Draw each slot's tip independently from the profile's tip pool
    /// instead of repeating `tips_base`.
    pub randomized_tips: bool,
}

/// Builds an [`Itinerary`] from an already-scheduled title sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItineraryAssembler {
    options: AssemblerOptions,
}

impl ItineraryAssembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    /// Lay `titles` out over `days` days of [`SLOTS_PER_DAY`] slots each.
    ///
    /// Titles are consumed with a single index that runs across all days.
    /// Random draws happen in a fixed order (day theme, then per slot: lunch
    /// for noon, then tip), so a seeded `rng` reproduces the same text.
    ///
    /// # Panics
    ///
    /// Panics if `titles` holds fewer than `days * SLOTS_PER_DAY` entries.
    /// [`crate::schedule::schedule`] always returns exactly that many.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        destination: &str,
        days: usize,
        titles: &[String],
        profile: &StyleProfile,
        rng: &mut R,
    ) -> Itinerary {
        assert!(
            titles.len() >= days * SLOTS_PER_DAY,
            "need {} scheduled titles, got {}",
            days * SLOTS_PER_DAY,
            titles.len()
        );

        let mut next = titles.iter();
        let plans = (1..=days)
            .map(|day| {
                let theme = if self.options.themed_days {
                    profile.theme_pool.choose(rng).cloned()
                } else {
                    None
                };

                let schedule = SlotKind::ALL
                    .iter()
                    .zip(next.by_ref())
                    .map(|(&kind, title)| self.slot(kind, title, profile, rng))
                    .collect();

                DayPlan {
                    day,
                    theme,
                    schedule,
                }
            })
            .collect();

        Itinerary {
            destination: destination.to_string(),
            days: plans,
        }
    }

    fn slot<R: Rng + ?Sized>(
        &self,
        kind: SlotKind,
        title: &str,
        profile: &StyleProfile,
        rng: &mut R,
    ) -> Slot {
        let detail = match kind {
            SlotKind::Noon => profile
                .lunch_pool
                .choose(rng)
                .map(|lunch| noon_detail(lunch))
                .unwrap_or_else(|| fixed_detail(SlotKind::Noon).to_string()),
            other => fixed_detail(other).to_string(),
        };

        let tips = if self.options.randomized_tips {
            profile
                .tip_pool
                .choose(rng)
                .unwrap_or(&profile.tips_base)
                .clone()
        } else {
            profile.tips_base.clone()
        };

        Slot {
            time: kind.time().to_string(),
            label: kind.label().to_string(),
            title: title.to_string(),
            detail,
            tips,
        }
    }
}

fn noon_detail(lunch: &str) -> String {
    format!("近くで休憩・ランチを想定。{lunch}がおすすめ。無理のない移動距離で。")
}

fn fixed_detail(kind: SlotKind) -> &'static str {
    match kind {
        SlotKind::Morning | SlotKind::LateMorning => {
            "まずは人気スポットからスタート。周辺も合わせて散策しましょう。"
        }
        SlotKind::Afternoon => "同じエリア内で無理なく巡るプランです。カフェ休憩もどうぞ。",
        SlotKind::Evening => "夕暮れから夜の街並みをゆっくり楽しみましょう。",
        SlotKind::Noon => "近くで休憩・ランチを想定。無理のない移動距離で。",
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::style;

    fn titles(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("spot-{i}")).collect()
    }

    #[test]
    fn plain_variant_shape() {
        let profile = style::resolve("ゆったり");
        let assembler = ItineraryAssembler::default();
        let it = assembler.assemble("京都", 3, &titles(15), profile, &mut StdRng::seed_from_u64(1));

        assert_eq!(it.destination, "京都");
        assert_eq!(it.days.len(), 3);
        for (i, day) in it.days.iter().enumerate() {
            assert_eq!(day.day, i + 1);
            assert!(day.theme.is_none());
            assert_eq!(day.schedule.len(), SLOTS_PER_DAY);
            for slot in &day.schedule {
                assert_eq!(slot.tips, profile.tips_base);
            }
        }
    }

    #[test]
    fn titles_are_consumed_across_days_in_order() {
        let assembler = ItineraryAssembler::default();
        let input = titles(10);
        let it = assembler.assemble(
            "京都",
            2,
            &input,
            style::default_profile(),
            &mut StdRng::seed_from_u64(1),
        );
        let got: Vec<&str> = it.titles().collect();
        assert_eq!(got, input.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(it.days[1].schedule[0].title, "spot-5");
    }

    #[test]
    fn extra_titles_are_ignored() {
        let assembler = ItineraryAssembler::default();
        let it = assembler.assemble(
            "京都",
            1,
            &titles(12),
            style::default_profile(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(it.slot_count(), 5);
    }

    #[test]
    fn noon_detail_embeds_a_lunch_phrase() {
        let profile = style::resolve("食べ歩き");
        let it = ItineraryAssembler::default().assemble(
            "大阪",
            2,
            &titles(10),
            profile,
            &mut StdRng::seed_from_u64(3),
        );
        for day in &it.days {
            let noon = &day.schedule[2];
            assert_eq!(noon.time, "12:30");
            assert_eq!(noon.label, "昼");
            assert!(
                profile.lunch_pool.iter().any(|l| noon.detail.contains(l.as_str())),
                "noon detail without lunch phrase: {}",
                noon.detail
            );
        }
    }

    #[test]
    fn rich_variant_draws_from_pools() {
        let profile = style::resolve("写真映え");
        let assembler = ItineraryAssembler::new(AssemblerOptions {
            themed_days: true,
            randomized_tips: true,
        });
        let it = assembler.assemble("横浜", 4, &titles(20), profile, &mut StdRng::seed_from_u64(9));

        for day in &it.days {
            let theme = day.theme.as_ref().expect("themed day");
            assert!(profile.theme_pool.contains(theme));
            for slot in &day.schedule {
                assert!(profile.tip_pool.contains(&slot.tips));
            }
        }
    }

    #[test]
    fn seeded_rng_reproduces_text() {
        let profile = style::resolve("落ち着いた旅");
        let assembler = ItineraryAssembler::new(AssemblerOptions {
            themed_days: true,
            randomized_tips: true,
        });
        let a = assembler.assemble("鎌倉", 2, &titles(10), profile, &mut StdRng::seed_from_u64(5));
        let b = assembler.assemble("鎌倉", 2, &titles(10), profile, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "need 10 scheduled titles")]
    fn short_title_sequence_panics() {
        ItineraryAssembler::default().assemble(
            "京都",
            2,
            &titles(4),
            style::default_profile(),
            &mut StdRng::seed_from_u64(1),
        );
    }
}
