use tablp::*;

const EPS: f64 = 0.000001;

pub const TRANSPORTATION: &str = include_str!("../../data/transportation.sheets");
pub const PIZZA: &str = include_str!("../../data/pizza.sheets");

pub fn assert_optimal(result: &SolverResult, expected_obj: f64, expected_x: &[f64]) {
    match result {
        SolverResult::Optimal(sol) => {
            assert!(
                (sol.obj() - expected_obj).abs() < EPS,
                "obj: {}, expected: {}",
                sol.obj(),
                expected_obj
            );

            let x = sol.x();

            assert_eq!(x.len(), expected_x.len());

            for (x1, x2) in x.iter().zip(expected_x) {
                assert!((x1 - x2).abs() < EPS, "x_i: {}, expected: {}", x1, x2);
            }
        }

        _ => panic!("not optimal: {:?}", result),
    }
}

pub fn assert_optimal_obj(result: &SolverResult, expected_obj: f64) {
    match result {
        SolverResult::Optimal(sol) => {
            assert!(
                (sol.obj() - expected_obj).abs() < EPS,
                "obj: {}, expected: {}",
                sol.obj(),
                expected_obj
            );
        }

        _ => panic!("not optimal: {:?}", result),
    }
}

pub fn assert_infeasible(result: &SolverResult) {
    match result {
        SolverResult::Infeasible => (),
        _ => panic!("not infeasible: {:?}", result),
    }
}

pub fn assert_unbounded(result: &SolverResult) {
    match result {
        SolverResult::Unbounded => (),
        _ => panic!("not unbounded: {:?}", result),
    }
}

pub struct TestProblem {
    pub prob: Problem,
    pub check_result: Box<dyn FnOnce(&SolverResult)>,
}

impl TestProblem {
    fn new<F: FnOnce(&SolverResult) + 'static>(prob: Problem, check_result: F) -> Self {
        Self {
            prob,
            check_result: Box::new(check_result),
        }
    }
}

pub struct TestModel {
    pub model: AbstractModel,
    pub check_solved: Box<dyn FnOnce(&Solved)>,
}

impl TestModel {
    fn new<F: FnOnce(&Solved) + 'static>(model: AbstractModel, check_solved: F) -> Self {
        Self {
            model,
            check_solved: Box::new(check_solved),
        }
    }
}

pub fn one_variable_slack_constraint() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(1., Bound::TwoSided(-1., 1.), Some("x".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.)], ConstraintOp::Lte, 0.5)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| {
        assert_optimal(result, -1., &[-1.])
    })
}

pub fn one_variable_infeasible() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(1., Bound::TwoSided(-1., 1.), Some("x".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.)], ConstraintOp::Gte, 2.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| assert_infeasible(result))
}

pub fn one_variable_unbounded_upper() -> TestProblem {
    let mut prob = Problem::new(Sense::Maximize);

    let x = prob
        .add_var(1., Bound::Lower(0.), Some("x".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.)], ConstraintOp::Gte, 1.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| assert_unbounded(result))
}

pub fn two_variables_unbounded() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(-1., Bound::Lower(0.), Some("x".to_string()))
        .unwrap();

    let y = prob
        .add_var(1., Bound::Lower(0.), Some("y".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.), (y, -1.)], ConstraintOp::Gte, 0.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| assert_unbounded(result))
}

pub fn two_variables_infeasible_with_bounds() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(1., Bound::TwoSided(0., 1.), Some("x".to_string()))
        .unwrap();

    let y = prob
        .add_var(1., Bound::TwoSided(0., 1.), Some("y".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.), (y, 1.)], ConstraintOp::Gte, 3.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| assert_infeasible(result))
}

pub fn linear_system_2d() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(0., Bound::Free, Some("x".to_string()))
        .unwrap();

    let y = prob
        .add_var(0., Bound::Free, Some("y".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 2.), (y, 1.)], ConstraintOp::Eq, 1.)
        .unwrap();

    prob.add_constraint(vec![(x, 3.), (y, 1.)], ConstraintOp::Eq, 1.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| {
        assert_optimal(result, 0., &[0., 1.])
    })
}

pub fn linear_system_3d() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(0., Bound::Free, Some("x".to_string()))
        .unwrap();

    let y = prob
        .add_var(0., Bound::Free, Some("y".to_string()))
        .unwrap();

    let z = prob
        .add_var(0., Bound::Free, Some("z".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.), (y, 2.), (z, 4.)], ConstraintOp::Eq, 1.)
        .unwrap();

    prob.add_constraint(vec![(x, 3.), (y, 4.), (z, 8.)], ConstraintOp::Eq, 2.)
        .unwrap();

    prob.add_constraint(vec![(x, 5.), (y, 6.), (z, 13.)], ConstraintOp::Eq, 5.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| {
        assert_optimal(result, 0., &[0., -3.5, 2.])
    })
}

pub fn linear_system_3d_infeasible() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x = prob
        .add_var(0., Bound::Free, Some("x".to_string()))
        .unwrap();

    let y = prob
        .add_var(0., Bound::Free, Some("y".to_string()))
        .unwrap();

    let z = prob
        .add_var(0., Bound::Free, Some("z".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x, 1.), (y, 2.), (z, 4.)], ConstraintOp::Eq, 1.)
        .unwrap();

    prob.add_constraint(vec![(x, 3.), (y, 4.), (z, 8.)], ConstraintOp::Eq, 2.)
        .unwrap();

    prob.add_constraint(vec![(x, 5.), (y, 6.), (z, 12.)], ConstraintOp::Eq, 5.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| assert_infeasible(result))
}

pub fn small_prob_1() -> TestProblem {
    let mut prob = Problem::new(Sense::Minimize);

    let x1 = prob
        .add_var(2., Bound::TwoSided(-1., 1.), Some("x1".to_string()))
        .unwrap();

    let x2 = prob
        .add_var(10., Bound::Upper(6.), Some("x2".to_string()))
        .unwrap();

    let x3 = prob
        .add_var(0., Bound::Lower(0.), Some("x3".to_string()))
        .unwrap();

    let x4 = prob
        .add_var(1., Bound::Fixed(0.), Some("x4".to_string()))
        .unwrap();

    let x5 = prob
        .add_var(0., Bound::Free, Some("x5".to_string()))
        .unwrap();

    prob.add_constraint(vec![(x1, 2.5), (x2, 3.5)], ConstraintOp::Gte, 5.)
        .unwrap();

    prob.add_constraint(vec![(x2, 2.5), (x1, 4.5)], ConstraintOp::Lte, 1.)
        .unwrap();

    prob.add_constraint(vec![(x3, -1.), (x4, -3.), (x5, -4.)], ConstraintOp::Eq, 2.)
        .unwrap();

    TestProblem::new(prob, |result: &SolverResult| {
        assert_optimal_obj(result, 19.1578947368421);

        let x = result.solution().unwrap().x();
        assert!((x[0] + 0.94736842105).abs() < EPS);
        assert!((x[1] - 2.105263157894).abs() < EPS);
        assert!(x[3].abs() < EPS);
    })
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "actual: {}, expected: {}",
        actual,
        expected
    );
}

pub fn transportation() -> TestModel {
    let workbook = Workbook::parse(TRANSPORTATION).unwrap();
    let model = models::transportation::build(&workbook).unwrap();

    TestModel::new(model, move |solved: &Solved| {
        assert_eq!(solved.status(), TerminationStatus::Optimal);
        assert_close(solved.objective().unwrap(), 153.675);

        let shipments = models::transportation::shipments(solved, &workbook).unwrap();
        assert_eq!(shipments.shape(), vec![2, 3]);
        assert_eq!(shipments.row_labels()[0], "Seattle");
        assert_eq!(shipments.col_labels().unwrap()[2], "Topeka");

        let capacity = [350., 600.];
        let demand = [325., 300., 275.];

        for (i, cap) in capacity.iter().enumerate() {
            let shipped: f64 = (0..3).map(|j| shipments.get(i, j).unwrap()).sum();
            assert!(shipped <= cap + EPS);
        }

        for (j, dem) in demand.iter().enumerate() {
            let received: f64 = (0..2).map(|i| shipments.get(i, j).unwrap()).sum();
            assert!(received >= dem - EPS);
        }

        for i in 1..=2 {
            for j in 1..=3 {
                assert_close(
                    shipments.get(i - 1, j - 1).unwrap(),
                    solved.value("x", (i, j)).unwrap(),
                );
            }
        }
    })
}

pub fn pizza() -> TestModel {
    let workbook = Workbook::parse(PIZZA).unwrap();
    let model = models::pizza::build(&workbook).unwrap();

    TestModel::new(model, move |solved: &Solved| {
        assert_close(solved.objective().unwrap(), 920.);

        let plan = models::pizza::bake_plan(solved, &workbook).unwrap();
        assert_eq!(plan.shape(), vec![3, 1]);
        assert_eq!(plan.row_labels()[1], "Pepperoni");

        for (i, expected) in [40., 60., 0.].iter().enumerate() {
            assert_close(plan.get(i, 0).unwrap(), *expected);
        }

        let frame = solved.frame().unwrap();
        let column = frame.column("x").unwrap();
        assert_eq!(column.entries[0].0, Index::One(1));
        assert_close(column.entries[1].1, 60.);

        let frame = frame.with_index(plan.row_labels().to_vec()).unwrap();
        assert!(frame.to_string().contains("  Pepperoni "));
    })
}

//the veggie column has zero profit, so the other two pizzas share the dough
pub fn pizza_without_veggie() -> TestModel {
    let text = PIZZA.replace("Veggie, 7", "Veggie, 0");
    let workbook = Workbook::parse(&text).unwrap();
    let model = models::pizza::build(&workbook).unwrap();

    TestModel::new(model, |solved: &Solved| {
        assert_close(solved.objective().unwrap(), 920.);
        assert_close(solved.value("x", 3).unwrap(), 0.);
    })
}

//minimize x[1] + x[2] s.t. x[1] + x[2] + y >= budget, x <= 2
pub fn scalar_budget() -> TestModel {
    let mut model = AbstractModel::new("budget", Sense::Minimize);
    model.add_scalar_param("budget", 5.).unwrap();
    model.add_set("i", 2).unwrap();
    model.add_set("single", 1).unwrap();
    model.add_var("x", &["i"], Bound::TwoSided(0., 2.)).unwrap();
    model.add_var("y", &["single"], Bound::Lower(0.)).unwrap();

    model.set_objective(|inst| {
        let mut expr = LinearExpr::new();
        for i in inst.set("i")? {
            expr.add(inst.var("x", i)?, 1.);
        }
        Ok(expr)
    });

    model
        .add_constraint("floor", &["single"], |inst, index| {
            let mut expr = LinearExpr::new();
            for i in inst.set("i")? {
                expr.add(inst.var("x", i)?, 1.);
            }
            expr.add(inst.var("y", index)?, 1.);
            Ok(Some(expr.gte(inst.scalar("budget")?)))
        })
        .unwrap();

    TestModel::new(model, |solved: &Solved| {
        assert_close(solved.objective().unwrap(), 0.);
        assert!(solved.value("y", 1).unwrap() >= 5. - EPS);
    })
}

//x[i,j] >= 1 everywhere except the diagonal, where the rule skips the constraint
pub fn skipped_diagonal() -> TestModel {
    let mut model = AbstractModel::new("diagonal", Sense::Minimize);
    model.add_set("i", 3).unwrap();
    model.add_var("x", &["i", "i"], Bound::Lower(0.)).unwrap();

    model.set_objective(|inst| {
        let mut expr = LinearExpr::new();
        for index in inst.var_indices("x")? {
            expr.add(inst.var("x", index)?, 1.);
        }
        Ok(expr)
    });

    model
        .add_constraint("off_diagonal", &["i", "i"], |inst, index| match index {
            Index::Two(i, j) if i == j => Ok(None),
            _ => {
                let mut expr = LinearExpr::new();
                expr.add(inst.var("x", index)?, 1.);
                Ok(Some(expr.gte(1.)))
            }
        })
        .unwrap();

    TestModel::new(model, |solved: &Solved| {
        assert_eq!(solved.instance.problem().constraints().len(), 6);
        assert_close(solved.objective().unwrap(), 6.);

        for i in 1..=3 {
            assert_close(solved.value("x", (i, i)).unwrap(), 0.);
        }
    })
}

pub fn over_demanded() -> TestModel {
    let text = TRANSPORTATION.replace("Topeka, 275", "Topeka, 2750");
    let workbook = Workbook::parse(&text).unwrap();
    let model = models::transportation::build(&workbook).unwrap();

    TestModel::new(model, |solved: &Solved| {
        assert_eq!(solved.status(), TerminationStatus::Infeasible);
        assert!(matches!(
            solved.objective(),
            Err(TabLpError::NotOptimal(TerminationStatus::Infeasible))
        ));
        assert!(models::transportation::shipments(
            solved,
            &Workbook::parse(TRANSPORTATION).unwrap()
        )
        .is_err());
    })
}

pub fn unbounded_profit() -> TestModel {
    let text = PIZZA
        .replace("toppings, 1, 3, 2", "toppings, 1, 3, -2")
        .replace("dough, 1, 1, 1", "dough, 1, 1, -1")
        .replace("cheese, 3, 2, 2", "cheese, 3, 2, -2");
    let workbook = Workbook::parse(&text).unwrap();
    let model = models::pizza::build(&workbook).unwrap();

    TestModel::new(model, |solved: &Solved| {
        assert_eq!(solved.status(), TerminationStatus::Unbounded);
        assert!(solved.frame().is_err());
    })
}
