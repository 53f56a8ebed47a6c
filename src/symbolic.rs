#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedDifferentiator::symbolic::symbolic_engine::Expression;
/// let input = "sin(x) * (y - 3) ^ 2";
/// let parsed_expression: Expression<f64> = input.parse().unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.render(), "(sin(x) * ((y - 3) ^ 2))");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree and builds it with operators
/// 2) renders a symbolic expression into a string for printing and control results
/// 3) substitutes variables by expressions or numbers
///# Example#
/// ```
/// use RustedDifferentiator::symbolic::symbolic_engine::Expression;
/// let vars = Expression::<f64>::symbols("x, y");
/// let (x, y) = (vars[0].clone(), vars[1].clone());
/// let f = (x.clone() + Expression::number(5.0)) * (y - Expression::number(3.0));
/// assert_eq!(f.render(), "((x + 5) * (y - 3))");
/// let g = f.substitute("x", &x.sin());
/// assert_eq!(g.variables(), vec!["x", "y"]);
/// ```
pub mod symbolic_engine;
/// # Derivatives and evaluation
///# Example#
/// ```
/// use RustedDifferentiator::symbolic::symbolic_engine::Expression;
/// use std::collections::HashMap;
/// let f = Expression::<f64>::parse("x^3 + 3*x + 5").unwrap();
/// let df_dx = f.differentiate("x");
/// println!("df_dx = {}", df_dx);
/// let value = df_dx.evaluate(&HashMap::from([("x".to_string(), 2.0)])).unwrap();
/// assert_eq!(value, 15.0);
/// ```
pub mod symbolic_engine_derivatives;
/// error kinds of parsing and evaluation
pub mod symbolic_errors;
/// scalar types an expression is evaluated in: f64 and Complex<f64>
pub mod symbolic_traits;
/// bracket and operator scanning, finite differences
pub mod utils;
