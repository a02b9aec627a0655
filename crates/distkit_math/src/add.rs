use crate::spec::{EnumNumber, EnumOperand, EnumOperandPosition, TypeError};

fn validate_operand(
    operand: EnumOperand,
    position: EnumOperandPosition,
) -> Result<EnumNumber, TypeError> {
    match operand {
        EnumOperand::Int(v) => Ok(EnumNumber::Int(v)),
        EnumOperand::Float(v) if v.is_nan() => Err(TypeError::NotANumber { position }),
        EnumOperand::Float(v) => Ok(EnumNumber::Float(v)),
        other => Err(TypeError::NotNumeric {
            position,
            type_name: other.type_name(),
        }),
    }
}

/// Sum two operands of any type.
///
/// Both operands must be numeric and not NaN; nothing is coerced, so `"2"` is
/// rejected like any other string. Integer sums that overflow `i64` are
/// returned as `Float`.
pub fn add<A, B>(a: A, b: B) -> Result<EnumNumber, TypeError>
where
    A: Into<EnumOperand>,
    B: Into<EnumOperand>,
{
    let num_a = validate_operand(a.into(), EnumOperandPosition::First)?;
    let num_b = validate_operand(b.into(), EnumOperandPosition::Second)?;

    let num_sum = match (num_a, num_b) {
        (EnumNumber::Int(x), EnumNumber::Int(y)) => match x.checked_add(y) {
            Some(v) => EnumNumber::Int(v),
            None => EnumNumber::Float(x as f64 + y as f64),
        },
        (x, y) => EnumNumber::Float(x.as_f64() + y.as_f64()),
    };
    Ok(num_sum)
}

/// Typed variant of [`add`] for callers that already hold `f64` values.
pub fn add_f64(a: f64, b: f64) -> Result<f64, TypeError> {
    if a.is_nan() {
        return Err(TypeError::NotANumber {
            position: EnumOperandPosition::First,
        });
    }
    if b.is_nan() {
        return Err(TypeError::NotANumber {
            position: EnumOperandPosition::Second,
        });
    }
    Ok(a + b)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{add, add_f64};
    use crate::spec::{EnumNumber, EnumOperand, EnumOperandPosition, TypeError};

    #[test]
    fn add_sums_two_integers() {
        assert_eq!(add(1, 2), Ok(EnumNumber::Int(3)));
    }

    #[test]
    fn add_does_not_return_wrong_result() {
        let num_sum = add(1, 2).expect("add");
        assert_ne!(num_sum, 4_i64);
    }

    #[test]
    fn add_rejects_numeric_string() {
        let err = add(1, "2").expect_err("must fail");
        assert_eq!(
            err,
            TypeError::NotNumeric {
                position: EnumOperandPosition::Second,
                type_name: "string",
            }
        );
    }

    #[test]
    fn add_rejects_nan() {
        let err = add(f64::NAN, 2).expect_err("must fail");
        assert_eq!(
            err,
            TypeError::NotANumber {
                position: EnumOperandPosition::First,
            }
        );
    }

    #[rstest]
    #[case(EnumOperand::Text("1".to_string()))]
    #[case(EnumOperand::Bool(true))]
    #[case(EnumOperand::Null)]
    #[case(EnumOperand::List(vec![EnumOperand::Int(1)]))]
    #[case(EnumOperand::from(json!({"n": 1})))]
    #[case(EnumOperand::Float(f64::NAN))]
    fn add_rejects_invalid_operand_in_either_position(#[case] operand: EnumOperand) {
        assert!(add(operand.clone(), 1).is_err());
        assert!(add(1, operand).is_err());
    }

    #[rstest]
    #[case(0.1, 0.2)]
    #[case(-5.5, 5.5)]
    #[case(1e308, 1e308)]
    #[case(f64::INFINITY, 1.0)]
    #[case(-0.0, 0.0)]
    fn add_matches_native_float_addition(#[case] a: f64, #[case] b: f64) {
        assert_eq!(add(a, b).expect("add").as_f64(), a + b);
        assert_eq!(add(a, b), add(b, a));
    }

    #[rstest]
    #[case(i64::MAX, 1)]
    #[case(i64::MIN, -1)]
    fn add_promotes_integer_overflow_to_float(#[case] a: i64, #[case] b: i64) {
        let num_sum = add(a, b).expect("add");
        assert!(matches!(num_sum, EnumNumber::Float(_)));
        assert_eq!(num_sum.as_f64(), a as f64 + b as f64);
    }

    #[test]
    fn add_mixes_integer_and_float() {
        assert_eq!(add(1, 0.5), Ok(EnumNumber::Float(1.5)));
        assert_eq!(add(2, 1.0).expect("add"), 3_i64);
    }

    #[test]
    fn add_is_commutative_over_integer_grid() {
        for a in -20_i64..=20 {
            for b in -20_i64..=20 {
                assert_eq!(add(a, b), Ok(EnumNumber::Int(a + b)));
                assert_eq!(add(a, b), add(b, a));
            }
        }
    }

    #[test]
    fn add_accepts_json_numbers() {
        let num_sum = add(&json!(40), &json!(2.5)).expect("add");
        assert_eq!(num_sum, 42.5);
        assert!(add(&json!("40"), &json!(2)).is_err());
    }

    #[test]
    fn add_f64_guards_nan_only() {
        assert_eq!(add_f64(1.0, 2.0), Ok(3.0));
        assert_eq!(
            add_f64(1.0, f64::NAN),
            Err(TypeError::NotANumber {
                position: EnumOperandPosition::Second,
            })
        );
        assert_eq!(add_f64(f64::INFINITY, 1.0), Ok(f64::INFINITY));
    }

    #[test]
    fn type_error_messages_name_the_operand() {
        let err = add(true, 1).expect_err("must fail");
        assert_eq!(err.to_string(), "first operand must be a number, got boolean");
    }
}
