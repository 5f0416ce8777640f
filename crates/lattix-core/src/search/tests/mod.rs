mod constraint;
