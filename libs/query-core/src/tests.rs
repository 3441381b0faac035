#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::{
        parse_filters, parse_value, FieldRegistry, FieldType, FilterField, FilterSpecification,
        Operator, OperatorRegistry, QueryError, QueryOptions, QueryParams, SortOrder,
        SortSpecification, DEFAULT_SORT_FIELD,
    };

    fn lot_fields() -> FieldRegistry {
        FieldRegistry::new()
            .with("estate_type", FieldType::String)
            .with("rooms", FieldType::Integer)
            .with("district", FieldType::String)
            .with("price", FieldType::Integer)
            .with("created_at", FieldType::Date)
            .with("floor", FieldType::Integer)
    }

    fn parse(query: &str) -> FilterSpecification {
        parse_filters(
            &QueryParams::parse(query),
            &lot_fields(),
            &OperatorRegistry::standard(),
        )
    }

    #[test]
    fn test_field_registry_lookup() {
        let reg = lot_fields();
        assert_eq!(reg.declared_type("price"), Some(FieldType::Integer));
        assert_eq!(reg.declared_type("created_at"), Some(FieldType::Date));
        assert_eq!(reg.declared_type("owner_id"), None);
        assert_eq!(reg.len(), 6);
    }

    #[test]
    fn test_operator_registry_standard_tokens() {
        let ops = OperatorRegistry::standard();
        assert_eq!(ops.resolve("eq"), Some(Operator::Eq));
        assert_eq!(ops.resolve("neq"), Some(Operator::Ne));
        assert_eq!(ops.resolve("lt"), Some(Operator::Lt));
        assert_eq!(ops.resolve("lte"), Some(Operator::Le));
        assert_eq!(ops.resolve("gt"), Some(Operator::Gt));
        assert_eq!(ops.resolve("gte"), Some(Operator::Ge));
        assert_eq!(ops.resolve("EQ"), None);
        assert_eq!(ops.resolve("between"), None);
    }

    #[test]
    fn test_operator_registry_refuses_between_token() {
        let ops = OperatorRegistry::empty().with_token("range", Operator::Between);
        assert_eq!(ops.resolve("range"), None);
    }

    #[test]
    fn test_bare_value_and_eq_prefix_are_equivalent() {
        let bare = parse("price=100");
        let prefixed = parse("price=eq:100");
        assert_eq!(bare, prefixed);

        let atoms = bare.get("price").expect("price parsed");
        assert_eq!(
            atoms,
            &[FilterField::point("price", Operator::Eq, "100", FieldType::Integer)]
        );
    }

    #[test]
    fn test_date_range_is_one_between_atom() {
        let spec = parse("created_at=2022-01-01:2022-01-02");
        let atoms = spec.get("created_at").expect("created_at parsed");
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].operator, Operator::Between);
        assert_eq!(atoms[0].values, vec!["2022-01-01", "2022-01-02"]);
        assert_eq!(atoms[0].declared_type, FieldType::Date);
    }

    #[test]
    fn test_range_arity_is_unbounded() {
        let spec = parse("district=a:b:c");
        let atoms = spec.get("district").expect("district parsed");
        assert_eq!(atoms.len(), 1);
        assert!(atoms[0].is_range());
        assert_eq!(atoms[0].values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_operator_remainder_keeps_separators() {
        let spec = parse("created_at=gte:2022-01-01%2010:00:00");
        let atoms = spec.get("created_at").expect("created_at parsed");
        assert_eq!(atoms[0].operator, Operator::Ge);
        assert_eq!(atoms[0].values, vec!["2022-01-01 10:00:00"]);
    }

    #[test]
    fn test_repeated_params_become_separate_atoms() {
        let spec = parse("district=North&district=South");
        let atoms = spec.get("district").expect("district parsed");
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].values, vec!["North"]);
        assert_eq!(atoms[1].values, vec!["South"]);
    }

    #[test]
    fn test_unknown_fields_and_empty_values_are_dropped() {
        let spec = parse("bogus_field=1&price=&sort_by=price&rooms=2");
        assert!(spec.get("bogus_field").is_none());
        assert!(spec.get("price").is_none());
        assert!(spec.get("sort_by").is_none());
        assert_eq!(spec.atom_count(), 1);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let q = "district=North&price=gte:150&created_at=2022-01-01:2022-01-02&district=South";
        assert_eq!(parse(q), parse(q));
    }

    #[test]
    fn test_parse_value_skips_empty() {
        let ops = OperatorRegistry::standard();
        assert!(parse_value("price", "", FieldType::Integer, &ops).is_none());
    }

    #[test]
    fn test_every_operator_prefix() {
        for (token, op) in [
            ("eq", Operator::Eq),
            ("neq", Operator::Ne),
            ("lt", Operator::Lt),
            ("lte", Operator::Le),
            ("gt", Operator::Gt),
            ("gte", Operator::Ge),
        ] {
            let spec = parse(&format!("floor={token}:5"));
            let atom = &spec.get("floor").expect("floor parsed")[0];
            assert_eq!(atom.operator, op, "token {token}");
            assert_eq!(atom.values, vec!["5"]);
        }
    }

    #[test]
    fn test_filter_budget() {
        let spec = parse("rooms=1&rooms=2&rooms=3");
        assert!(spec.ensure_within(3).is_ok());
        assert_eq!(
            spec.ensure_within(2),
            Err(QueryError::TooManyFilters { count: 3, max: 2 })
        );
    }

    #[test]
    fn test_sort_defaults() {
        let sort = SortSpecification::resolve(None, None).expect("defaults resolve");
        assert_eq!(sort.field, DEFAULT_SORT_FIELD);
        assert_eq!(sort.order, SortOrder::Desc);

        let sort = SortSpecification::resolve(Some(""), Some("")).expect("empty resolves");
        assert_eq!(sort, SortSpecification::default());
    }

    #[test]
    fn test_sort_order_case_insensitive() {
        let sort = SortSpecification::resolve(Some("price"), Some("asc")).expect("asc");
        assert_eq!(sort, SortSpecification::new("price", SortOrder::Asc));

        let sort = SortSpecification::resolve(None, Some("DeSc")).expect("desc");
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_sort_order_rejects_unknown_token() {
        let err = SortSpecification::resolve(None, Some("sideways")).unwrap_err();
        assert_eq!(err, QueryError::InvalidSortOrder("sideways".into()));
    }

    #[test]
    fn test_sort_from_params() {
        let params = QueryParams::parse("sort_by=price&sort_order=ASC&price=gt:1");
        let sort = SortSpecification::from_params(&params).expect("resolves");
        assert_eq!(sort, SortSpecification::new("price", SortOrder::Asc));
    }

    #[test]
    fn test_query_options_accessors() {
        let filters = parse("price=lt:150&district=North");
        let opts = QueryOptions::new(SortSpecification::new("price", SortOrder::Asc), filters);
        assert_eq!(opts.order_by_clause(), "price ASC");
        assert_eq!(opts.filters_by_field().len(), 2);
        assert!(opts.filters_by_field().contains_key("district"));

        let opts = QueryOptions::default();
        assert_eq!(opts.order_by_clause(), "created_at DESC");
        assert!(opts.filters_by_field().is_empty());
    }

    #[test]
    fn test_query_params_keep_order_and_repetition() {
        let params = QueryParams::parse("a=1&b=2&a=3");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get_all("a").collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_query_params_value_outlives_lookup_key() {
        let params = QueryParams::parse("sort_by=price");
        let value = {
            let key = String::from("sort_by");
            params.get(&key)
        };
        assert_eq!(value, Some("price"));
    }
}
