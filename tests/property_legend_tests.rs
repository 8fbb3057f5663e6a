use chart_components::legend::{LegendLabel, LegendLabels, LegendModel, LegendModelParams};
use chart_components::theme::{LegendTheme, SeriesTheme};
use indexmap::IndexMap;
use proptest::prelude::*;

fn single_model(count: usize) -> LegendModel {
    let labels: Vec<String> = (0..count).map(|i| format!("s{i}")).collect();
    let legend_data = labels
        .iter()
        .map(|label| LegendLabel::new("bar", label.clone()))
        .collect();
    LegendModel::new(LegendModelParams::new(
        LegendLabels::Flat(labels),
        legend_data,
        LegendTheme::Flat(SeriesTheme::default_series()),
        "bar",
    ))
    .expect("legend model")
}

fn combo_model(counts: &[usize]) -> LegendModel {
    let chart_types: Vec<String> = (0..counts.len()).map(|i| format!("type{i}")).collect();
    let mut labels = IndexMap::new();
    let mut legend_data = Vec::new();
    for (chart_type, &count) in chart_types.iter().zip(counts) {
        let names: Vec<String> = (0..count).map(|i| format!("{chart_type}-{i}")).collect();
        legend_data.extend(
            names
                .iter()
                .map(|name| LegendLabel::new(chart_type.clone(), name.clone())),
        );
        labels.insert(chart_type.clone(), names);
    }
    LegendModel::new(
        LegendModelParams::new(
            LegendLabels::ByChartType(labels),
            legend_data,
            LegendTheme::ByChartType(IndexMap::new()),
            "combo",
        )
        .with_chart_types(chart_types),
    )
    .expect("combo model")
}

proptest! {
    #[test]
    fn fresh_legend_is_fully_checked_with_dense_series_indexes(count in 0usize..40) {
        let model = single_model(count);

        prop_assert_eq!(model.checked_indexes().len(), count);
        prop_assert!(model.checked_indexes().iter().all(|checked| *checked));
        for (position, item) in model.data().iter().enumerate() {
            prop_assert_eq!(item.index, position);
            prop_assert_eq!(item.series_index, Some(position));
        }
    }

    #[test]
    fn checked_update_yields_dense_indexes_over_the_checked_subset(
        mask in prop::collection::vec(any::<bool>(), 1..30)
    ) {
        let mut model = single_model(mask.len());
        let indexes: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(index, checked)| checked.then_some(index))
            .collect();

        model.update_checked_data(&indexes).expect("update");

        prop_assert_eq!(model.checked_indexes(), mask.as_slice());
        let participating: Vec<usize> = model
            .data()
            .iter()
            .filter_map(|item| item.series_index)
            .collect();
        if indexes.is_empty() {
            prop_assert_eq!(participating.len(), mask.len());
        } else {
            prop_assert_eq!(participating, (0..indexes.len()).collect::<Vec<_>>());
            for item in model.data() {
                prop_assert_eq!(item.series_index.is_some(), mask[item.index]);
            }
        }
    }

    #[test]
    fn toggling_twice_restores_selection(
        count in 1usize..20,
        initial in prop::option::of(0usize..20),
        index in 0usize..20
    ) {
        let mut model = single_model(count);
        model.update_selected_index(initial);

        model.toggle_selected_index(index);
        model.toggle_selected_index(index);

        if initial == Some(index) {
            // The first toggle clears, the second selects again.
            prop_assert_eq!(model.selected_index(), Some(index));
        } else {
            prop_assert_eq!(model.selected_index(), None);
        }
    }

    #[test]
    fn unselected_means_another_item_is_selected(
        count in 1usize..20,
        selected in prop::option::of(0usize..20),
        index in 0usize..20
    ) {
        let mut model = single_model(count);
        model.update_selected_index(selected);
        prop_assert_eq!(
            model.is_unselected_index(index),
            selected.is_some_and(|selected| selected != index)
        );
    }

    #[test]
    fn combo_series_indexes_restart_for_every_chart_type(
        counts in prop::collection::vec(0usize..6, 1..5)
    ) {
        let model = combo_model(&counts);
        prop_assert_eq!(model.len(), counts.iter().sum::<usize>());

        let mut position = 0;
        for (slot, &count) in counts.iter().enumerate() {
            let chart_type = format!("type{slot}");
            for local in 0..count {
                let item = &model.data()[position];
                prop_assert_eq!(&item.chart_type, &chart_type);
                prop_assert_eq!(item.index, position);
                prop_assert_eq!(item.series_index, Some(local));
                position += 1;
            }
        }
    }
}
