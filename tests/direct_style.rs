use anyhow::anyhow;
use control::{Cause, Control, Either, Presence, Try, Validation};
use std::cell::RefCell;
use tools::{init_logger, Flag};


#[test]
fn test_presence_all_present() {
    init_logger();

    let result = Presence::direct(|s| {
        let v1 = s.extract(Presence::present("v1"))?;
        let v2 = s.extract(Presence::present("v2"))?;
        let v3 = s.extract(Presence::present("v3"))?;
        Ok(format!("{}{}{}", v1, v2, v3))
    });

    assert_eq!(result, Presence::present("v1v2v3".to_string()));
}

#[test]
fn test_code_between_extractions_runs_once_in_order() {
    init_logger();
    let trace = RefCell::new(Vec::new());

    let result: Either<&str, u32> = Either::direct(|s| {
        trace.borrow_mut().push("a");
        let x = s.extract(Either::right(1))?;
        trace.borrow_mut().push("b");
        let y = s.extract(Either::right(2))?;
        trace.borrow_mut().push("c");
        Ok(x + y)
    });

    assert_eq!(result, Either::right(3));
    assert_eq!(*trace.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn test_trace_stops_at_the_aborting_extraction() {
    init_logger();
    let trace = RefCell::new(Vec::new());

    let result = Presence::direct(|s| {
        trace.borrow_mut().push("a");
        let x = s.extract(Presence::present(1))?;
        trace.borrow_mut().push("b");
        let y = s.extract(Presence::<i32>::absent())?;
        trace.borrow_mut().push("c");
        Ok(x + y)
    });

    assert_eq!(result, Presence::Absent);
    assert_eq!(*trace.borrow(), vec!["a", "b"]);
}

#[test]
fn test_presence_short_circuits() {
    init_logger();
    let processed_v3 = Flag::new();

    let result = Presence::direct(|s| {
        let v1 = s.extract(Presence::present("v1"))?;
        let v2: &str = s.extract(Presence::absent())?;
        processed_v3.set();
        let v3 = s.extract(Presence::present("v3"))?;
        Ok(format!("{}{}{}", v1, v2, v3))
    });

    assert!(result.is_empty());
    assert!(!processed_v3.is_set());
}

#[test]
fn test_either_returns_the_first_left_unchanged() {
    init_logger();
    let processed_v3 = Flag::new();

    let result = Either::direct(|s| {
        let v1 = s.extract(Either::right("v1"))?;
        let v2: &str = s.extract(Either::left("Short Circuit"))?;
        processed_v3.set();
        let v3 = s.extract(Either::right("v3"))?;
        Ok(format!("{}{}{}", v1, v2, v3))
    });

    assert_eq!(result, Either::left("Short Circuit"));
    assert!(!processed_v3.is_set());
}

#[test]
fn test_try_returns_the_identical_cause() {
    init_logger();
    let failure: Try<String> = Try::failure(anyhow!("Short Circuit"));
    let expected: Cause = failure.cause().clone();

    let result = Try::direct(|s| {
        let v1 = s.extract(Try::success("v1".to_string()))?;
        let v2 = s.extract(failure)?;
        Ok(v1 + &v2)
    });

    assert!(result.cause().ptr_eq(&expected));
    assert_eq!(result, Try::Failure(expected));
}

#[test]
fn test_validation_accumulates_every_error() {
    init_logger();

    let single = Validation::combine(
        Validation::valid("John Doe"),
        Validation::<&str, u32>::invalid("error1"),
    )
    .ap(|name, age| (name.to_string(), age));
    assert_eq!(single, Validation::invalid(vec!["error1"]));

    let several = Validation::combine(
        Validation::<&str, &str>::invalid("error2"),
        Validation::valid(39u32),
    )
    .combine(Validation::<&str, bool>::invalid("error3"))
    .ap(|name, age, active| (name.to_string(), age, active));
    assert_eq!(several, Validation::invalid(vec!["error2", "error3"]));
}

#[test]
fn test_nested_boundaries_all_positive() {
    init_logger();

    let result: Either<&str, u32> = Either::direct(|outer| {
        let inner = Presence::scoped(|inner| {
            let a = inner.extract(Presence::present(40))?;
            let b = outer.extract(Either::right(2))?;
            Ok(a + b)
        })?;
        Ok(inner.get())
    });

    assert_eq!(result, Either::right(42));
}

#[test]
fn test_nested_inner_negative_stays_inside() {
    init_logger();
    let after_inner = Flag::new();

    let result: Either<&str, u32> = Either::direct(|outer| {
        let inner: Presence<u32> = Presence::scoped(|inner| {
            inner.extract(Presence::<u32>::absent())?;
            Ok(1)
        })?;
        after_inner.set();
        let base = outer.extract(Either::right(41))?;
        Ok(base + inner.get_or_else(1))
    });

    assert_eq!(result, Either::right(42));
    assert!(after_inner.is_set());
}

#[test]
fn test_nested_outer_negative_passes_through_inner() {
    init_logger();
    let inner_rest = Flag::new();
    let outer_rest = Flag::new();

    let result: Either<&str, u32> = Either::direct(|outer| {
        let inner: Presence<u32> = Presence::scoped(|inner| {
            let a = inner.extract(Presence::present(1))?;
            let b: u32 = outer.extract(Either::left("outer failed"))?;
            inner_rest.set();
            Ok(a + b)
        })?;
        outer_rest.set();
        Ok(inner.get())
    });

    assert_eq!(result, Either::left("outer failed"));
    assert!(!inner_rest.is_set());
    assert!(!outer_rest.is_set());
}

#[test]
fn test_outer_failure_through_inner_validation() {
    init_logger();
    let failure: Try<u32> = Try::failure(anyhow!("outer"));
    let expected = failure.cause().clone();

    let result = Try::direct(|outer| {
        let inner: Validation<&str, u32> = Validation::scoped(|inner| {
            let a = inner.extract(Validation::valid(1))?;
            let b = outer.extract(failure)?;
            Ok(a + b)
        })?;
        Ok(inner.get())
    });

    assert!(result.cause().ptr_eq(&expected));
}

#[test]
fn test_sibling_boundaries_do_not_interfere() {
    init_logger();

    let first = Presence::direct(|s| s.extract(Presence::<u8>::absent()));
    let second = Presence::direct(|s| s.extract(Presence::present(7u8)));

    assert_eq!(first, Presence::Absent);
    assert_eq!(second, Presence::present(7));
}

#[test]
#[should_panic(expected = "reached a top-level `direct`")]
fn test_outer_escape_into_inner_direct_panics() {
    let _: Either<&str, u32> = Either::direct(|outer| {
        let inner = Presence::direct(|_| outer.extract(Either::<&str, u32>::left("lost")));
        Ok(inner.get())
    });
}
