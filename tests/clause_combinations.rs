//! The clause combination is a language restriction: HAVING is only
//! legal after GROUP BY, and ORDER BY only after HAVING. Of the sixteen
//! presence-combinations of {WHERE, GROUP BY, HAVING, ORDER BY} exactly
//! eight must be accepted.

use sqltree::parse;

fn query(with_where: bool, with_group: bool, with_having: bool, with_order: bool) -> String {
    let mut q = String::from("select a from t");
    if with_where {
        q.push_str(" where a > 1");
    }
    if with_group {
        q.push_str(" group by a");
    }
    if with_having {
        q.push_str(" having a > 2");
    }
    if with_order {
        q.push_str(" order by a");
    }
    q
}

#[test]
fn test_exactly_eight_combinations_are_accepted() {
    let mut accepted = 0;

    for mask in 0..16u32 {
        let with_where = mask & 1 != 0;
        let with_group = mask & 2 != 0;
        let with_having = mask & 4 != 0;
        let with_order = mask & 8 != 0;

        let legal = (!with_having || with_group) && (!with_order || with_having);
        let source = query(with_where, with_group, with_having, with_order);
        let result = parse(&source);

        assert_eq!(
            result.is_ok(),
            legal,
            "combination {:?} should be {}",
            source,
            if legal { "accepted" } else { "rejected" }
        );

        if let Ok(tree) = result {
            accepted += 1;

            // Uniform 6-slot shape, sentinels exactly where clauses
            // are absent
            let childs = tree.children();
            assert_eq!(childs.len(), 6);
            assert_eq!(childs[2].is_placeholder(), !with_where);
            assert_eq!(childs[3].is_placeholder(), !with_group);
            assert_eq!(childs[4].is_placeholder(), !with_having);
            assert_eq!(childs[5].is_placeholder(), !with_order);
        }
    }

    assert_eq!(accepted, 8);
}
